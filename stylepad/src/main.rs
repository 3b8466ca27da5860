use clap::{Parser, Subcommand};
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use stylepad_lib::inspect::report;
use stylepad_lib::server::{self, ServerConfig};
use stylepad_lib::store::MatchMode;

const STYLEPAD_INTRO: &str = r#"
       _         _                      _
   ___| |_ _   _| | ___ _ __   __ _  __| |
  / __| __| | | | |/ _ \ '_ \ / _` |/ _` |
  \__ \ |_| |_| | |  __/ |_) | (_| | (_| |
  |___/\__|\__, |_|\___| .__/ \__,_|\__,_|
           |___/       |_|

    Welcome to stylepad - click, tweak, and keep your page styles!
"#;

#[derive(Parser)]
#[command(name = "stylepad")]
#[command(about = "Visual style editor backend and page inspector")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the stylesheet HTTP service.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,

        #[arg(short, long, env = "STYLEPAD_PORT", default_value_t = 3001)]
        port: u16,

        /// Stylesheet the edits are merged into.
        #[arg(long, env = "STYLEPAD_STYLES", default_value = "css/editor-custom.css")]
        styles: PathBuf,

        /// Replace every declaration whose text mentions the property, not
        /// just the property itself.
        #[arg(long)]
        legacy_substring_match: bool,
    },
    /// List every element of a page with its selector and category.
    Inspect {
        /// HTML file.
        html: PathBuf,

        /// Stylesheets, in link order.
        #[arg(long = "css")]
        css: Vec<PathBuf>,
    },
}

fn read_file(path: &PathBuf) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // parse the args given in terminal
    let args: Args = Args::parse();

    match args.command {
        Command::Serve {
            host,
            port,
            styles,
            legacy_substring_match,
        } => {
            println!("{}", STYLEPAD_INTRO);
            let config = ServerConfig {
                addr: SocketAddr::new(host, port),
                styles_path: styles,
                match_mode: if legacy_substring_match {
                    MatchMode::Substring
                } else {
                    MatchMode::Exact
                },
            };
            if let Err(e) = server::serve(config).await {
                log::error!("{}", e);
                std::process::exit(1);
            }
        }
        Command::Inspect { html, css } => {
            let html_content = read_file(&html);
            let stylesheets: Vec<String> = css.iter().map(read_file).collect();
            let sheet_refs: Vec<&str> = stylesheets.iter().map(String::as_str).collect();
            match report::inspect(&html_content, &sheet_refs) {
                Ok(summaries) => print!("{}", report::render(&summaries)),
                Err(e) => {
                    eprintln!("Error inspecting {}: {}", html.display(), e);
                    std::process::exit(1);
                }
            }
        }
    }
}
