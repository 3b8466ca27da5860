//! Color value conversions between what a stylesheet says, what a browser
//! reports for a resolved style, and what a color picker accepts.

use once_cell::sync::Lazy;
use regex::Regex;

static RGB_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgba?\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*(?:,\s*([0-9.]+)\s*)?\)$")
        .expect("static regex")
});

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("lime", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("silver", [192, 192, 192]),
    ("navy", [0, 0, 128]),
    ("teal", [0, 128, 128]),
];

/// Properties whose resolved value is a color.
pub const COLOR_PROPERTIES: &[&str] = &["color", "background-color", "border-color"];

/// Converts a resolved color into the `#rrggbb` form a color picker takes.
///
/// Transparent and unparseable input both come out as `#000000`.
pub fn to_hex(value: &str) -> String {
    const FALLBACK: &str = "#000000";
    let value = value.trim();
    if value.is_empty() || value == "transparent" || value == "rgba(0, 0, 0, 0)" {
        return FALLBACK.to_string();
    }
    match parse_rgb(value) {
        Some(([r, g, b], _)) => format!("#{:02x}{:02x}{:02x}", r, g, b),
        None => FALLBACK.to_string(),
    }
}

/// Rewrites any supported color form into functional notation, the way
/// `getComputedStyle` reports colors. Returns `None` for values that are not
/// colors we know.
pub fn to_rgb_notation(value: &str) -> Option<String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("transparent") {
        return Some("rgba(0, 0, 0, 0)".to_string());
    }
    let ([r, g, b], alpha) = parse_rgb(value)?;
    Some(match alpha {
        Some(a) if a < 1.0 => format!("rgba({}, {}, {}, {})", r, g, b, a),
        _ => format!("rgb({}, {}, {})", r, g, b),
    })
}

fn parse_rgb(value: &str) -> Option<([u8; 3], Option<f32>)> {
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(caps) = RGB_FUNCTION.captures(value) {
        let channel = |i: usize| -> Option<u8> {
            let n: u32 = caps.get(i)?.as_str().parse().ok()?;
            Some(n.min(255) as u8)
        };
        let alpha = caps.get(4).and_then(|m| m.as_str().parse::<f32>().ok());
        return Some(([channel(1)?, channel(2)?, channel(3)?], alpha));
    }
    let lower = value.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, rgb)| (*rgb, None))
}

fn parse_hex(hex: &str) -> Option<([u8; 3], Option<f32>)> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expand = |s: &str| u8::from_str_radix(&s.repeat(2), 16).ok();
    let pair = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 | 4 => {
            let rgb = [expand(&hex[0..1])?, expand(&hex[1..2])?, expand(&hex[2..3])?];
            let alpha = if hex.len() == 4 {
                Some(expand(&hex[3..4])? as f32 / 255.0)
            } else {
                None
            };
            Some((rgb, alpha))
        }
        6 | 8 => {
            let rgb = [pair(&hex[0..2])?, pair(&hex[2..4])?, pair(&hex[4..6])?];
            let alpha = if hex.len() == 8 {
                Some(pair(&hex[6..8])? as f32 / 255.0)
            } else {
                None
            };
            Some((rgb, alpha))
        }
        _ => None,
    }
}
