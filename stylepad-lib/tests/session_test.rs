use std::cell::RefCell;
use std::time::Duration;
use stylepad_lib::classify::Category;
use stylepad_lib::editor::fade::FadePreset;
use stylepad_lib::editor::panels::PanelKind;
use stylepad_lib::editor::{EditorConfig, HttpBackend, StyleBackend, StyleEdit, StyleEditorSession};
use stylepad_lib::error::EditorError;
use stylepad_lib::page::Page;
use stylepad_lib::server::serve_on;
use stylepad_lib::store::{MatchMode, StyleStore};
use tokio::net::TcpListener;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
  <p class="hero-text">Build faster</p>
  <div class="logo-slider infinite">
    <img src="a.png">
  </div>
  <a class="btn primary" href="/go">Go</a>
  <div class="nwb-editor-panel"><input class="nwb-editor-field"></div>
</body>
</html>"#;

const CSS: &str = "body { margin: 0px; } .hero-text { color: #336699; }";

#[derive(Default)]
struct RecordingBackend {
    edits: RefCell<Vec<StyleEdit>>,
    fail_clear: bool,
}

impl StyleBackend for RecordingBackend {
    fn forward(&self, edit: StyleEdit) {
        self.edits.borrow_mut().push(edit);
    }

    async fn clear_all(&self) -> Result<(), EditorError> {
        if self.fail_clear {
            Err(EditorError::ServerUnreachable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

fn recording_session(backend: RecordingBackend) -> StyleEditorSession<RecordingBackend> {
    let page = Page::new(PAGE, &[CSS]).expect("page");
    StyleEditorSession::new(page, backend, EditorConfig::default())
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_click_edit_and_forward() {
        let mut session = recording_session(RecordingBackend::default());
        session.toggle();
        let p = session.page().query(".hero-text").expect("p");
        let before = session.page().bounding_rect(&p).expect("rect");

        assert!(session.click(&p).expect("click"));
        assert_eq!(session.form().badge, "TEXT");
        assert_eq!(session.form().element_label, "p.hero-text");
        assert_eq!(
            session.form().visible_panels(),
            vec![PanelKind::Text, PanelKind::Common]
        );
        let color = session.form().field("color").expect("color field");
        assert_eq!(color.value, "rgb(51, 102, 153)");
        assert_eq!(color.picker.as_deref(), Some("#336699"));
        assert_eq!(session.form().field("fontSize").expect("size").value, "16px");

        session.commit_input("fontSize", "24px").expect("edit");

        assert_eq!(session.page().computed_style(&p).get("font-size"), "24px");
        assert!(session.highlight().height > before.height);
        assert_eq!(session.highlight().data_tag.as_deref(), Some("p"));
        assert_eq!(
            *session.backend().edits.borrow(),
            vec![StyleEdit {
                selector: ".hero-text".to_string(),
                property: "fontSize".to_string(),
                value: "24px".to_string(),
            }]
        );
    }

    #[test]
    fn test_auto_save_off_keeps_edits_local() {
        let mut session = recording_session(RecordingBackend::default());
        session.toggle();
        session.set_auto_save(false);
        let link = session.page().query(".btn").expect("link");
        session.click(&link).expect("click");
        // <a> is a text tag, so it never reaches the button rule
        assert_eq!(session.selection().map(|s| s.category), Some(Category::Text));

        session.commit_color("color", "#ff0000").expect("edit");
        assert_eq!(
            session.page().computed_style(&link).get("color"),
            "rgb(255, 0, 0)"
        );
        assert_eq!(session.form().field("color").expect("field").value, "#ff0000");
        assert!(session.backend().edits.borrow().is_empty());
    }

    #[test]
    fn test_fade_controls_write_both_mask_properties() {
        let mut session = recording_session(RecordingBackend::default());
        session.toggle();
        let slider = session.page().query(".logo-slider").expect("slider");
        session.click(&slider).expect("click");
        assert_eq!(session.form().badge, "CAROUSEL");

        session.apply_fade_preset(FadePreset::Strong).expect("preset");
        session.set_fade_right(5).expect("slider");
        assert_eq!(session.fade().active_preset, Some(FadePreset::Strong));

        let expected = "linear-gradient(to right, transparent, black 20%, black 95%, transparent)";
        assert_eq!(session.form().field("maskImage").expect("mask").value, expected);
        let style = session.page().computed_style(&slider);
        assert_eq!(style.get("mask-image"), expected);
        assert_eq!(style.get("-webkit-mask-image"), expected);

        let edits = session.backend().edits.borrow();
        let last_two: Vec<&str> = edits[edits.len() - 2..]
            .iter()
            .map(|e| e.property.as_str())
            .collect();
        assert_eq!(last_two, vec!["maskImage", "webkitMaskImage"]);
        assert!(edits.iter().all(|e| e.selector == ".logo-slider"));
    }

    #[test]
    fn test_hover_skips_selection_and_editor_ui() {
        let mut session = recording_session(RecordingBackend::default());
        let p = session.page().query(".hero-text").expect("p");
        let img = session.page().query("img").expect("img");
        let field = session.page().query(".nwb-editor-field").expect("field");

        session.pointer_move(&img).expect("move");
        assert!(!session.hover().visible);

        session.toggle();
        session.pointer_move(&img).expect("move");
        assert!(session.hover().visible);
        assert_eq!(session.hover().data_tag.as_deref(), Some("img"));

        session.pointer_move(&field).expect("move");
        assert!(!session.hover().visible);

        session.click(&p).expect("click");
        session.pointer_move(&p).expect("move");
        assert!(!session.hover().visible);
        assert!(!session.click(&field).expect("click"));
        assert!(session.selection().is_some());
    }

    #[test]
    fn test_highlight_follows_scroll() {
        let mut session = recording_session(RecordingBackend::default());
        session.toggle();
        let p = session.page().query(".hero-text").expect("p");
        session.click(&p).expect("click");
        let top = session.highlight().top;

        session.scroll_to(0.0, 120.0).expect("scroll");
        // document coordinates do not move with the viewport
        assert_eq!(session.highlight().top, top);
        session.resize(400.0, 300.0).expect("resize");
        assert!(session.highlight().width <= 400.0);
    }

    #[test]
    fn test_reset_restores_stylesheet_values() {
        let mut session = recording_session(RecordingBackend::default());
        session.toggle();
        let p = session.page().query(".hero-text").expect("p");
        session.click(&p).expect("click");
        session.commit_input("fontSize", "40px").expect("edit");
        session.commit_input("color", "#000000").expect("edit");

        session.reset().expect("reset");
        let borrowed = p.borrow();
        assert_eq!(borrowed.as_element().and_then(|e| e.attr("style")), None);
        drop(borrowed);
        assert_eq!(session.form().field("fontSize").expect("size").value, "16px");
        assert_eq!(
            session.form().field("color").expect("color").value,
            "rgb(51, 102, 153)"
        );
    }

    #[test]
    fn test_save_all_is_informational() {
        let session = recording_session(RecordingBackend::default());
        assert!(session.save_all().contains("auto-saved"));
    }

    #[tokio::test]
    async fn test_clear_failure_leaves_state() {
        let mut session = recording_session(RecordingBackend {
            fail_clear: true,
            ..Default::default()
        });
        session.toggle();
        let p = session.page().query(".hero-text").expect("p");
        session.click(&p).expect("click");
        session.commit_input("fontSize", "30px").expect("edit");

        let err = session.clear_all_changes().await.expect_err("should fail");
        assert!(err.to_string().starts_with("Failed to clear. Is the server running?"));
        assert!(session.is_active());
        assert!(session.selection().is_some());
        assert_eq!(session.page().computed_style(&p).get("font-size"), "30px");
    }

    #[tokio::test]
    async fn test_clear_success_starts_over() {
        let mut session = recording_session(RecordingBackend::default());
        session.toggle();
        let p = session.page().query(".hero-text").expect("p");
        session.click(&p).expect("click");
        session.commit_input("fontSize", "30px").expect("edit");
        session.set_auto_save(false);

        session.clear_all_changes().await.expect("clear");
        assert!(!session.is_active());
        assert!(session.auto_save());
        assert!(!session.highlight().visible);
        assert_eq!(session.form().badge, "—");
        let fresh = session.page().query(".hero-text").expect("p");
        assert_eq!(session.page().computed_style(&fresh).get("font-size"), "16px");
    }

    #[tokio::test]
    async fn test_http_backend_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = StyleStore::new(dir.path().join("editor-custom.css"), MatchMode::Exact);
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(serve_on(listener, store.clone()));

        let config = EditorConfig {
            api_url: format!("http://{}", addr),
            auto_save: true,
        };
        let backend = HttpBackend::new(&config, tokio::runtime::Handle::current());
        let page = Page::new(PAGE, &[CSS]).expect("page");
        let mut session = StyleEditorSession::new(page, backend, config);
        session.toggle();
        let p = session.page().query(".hero-text").expect("p");
        session.click(&p).expect("click");
        session.commit_input("letterSpacing", "2px").expect("edit");

        let mut saved = String::new();
        for _ in 0..100 {
            saved = store.get_all().expect("read");
            if saved.contains("letter-spacing: 2px;") {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(saved.contains(".hero-text {\n    letter-spacing: 2px;\n}"));

        session.clear_all_changes().await.expect("clear");
        assert!(!store.get_all().expect("read").contains(".hero-text"));
    }

    #[tokio::test]
    async fn test_http_backend_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let config = EditorConfig {
            api_url: format!("http://{}", addr),
            auto_save: true,
        };
        let backend = HttpBackend::new(&config, tokio::runtime::Handle::current());
        let result = backend.clear_all().await;
        assert!(matches!(result, Err(EditorError::ServerUnreachable(_))));
    }
}
