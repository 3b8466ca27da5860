use stylepad_lib::store::{MatchMode, RuleSet, StyleStore, HEADER};
use tempfile::TempDir;

#[cfg(test)]
pub mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store_in(dir: &TempDir, mode: MatchMode) -> StyleStore {
        StyleStore::new(dir.path().join("css").join("editor-custom.css"), mode)
    }

    #[test]
    fn test_hyphenated_upsert_replaces_camel_case() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir, MatchMode::Exact);
        store.upsert(".card", "backgroundColor", "#fff").expect("upsert");
        store.upsert(".card", "background-color", "#000").expect("upsert");

        let css = store.get_all().expect("read");
        assert_eq!(css.matches("background-color").count(), 1);
        assert!(css.contains("    background-color: #000;\n"));
    }

    #[test]
    fn test_clear_all_leaves_header_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir, MatchMode::Exact);
        store.upsert(".a", "color", "red").expect("upsert");
        store.clear_all().expect("clear");
        let css = store.get_all().expect("read");
        assert_eq!(css, format!("{}\n", HEADER));
        assert!(RuleSet::parse(&css).is_empty());
    }

    #[test]
    fn test_clear_all_creates_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir, MatchMode::Exact);
        store.clear_all().expect("clear");
        assert!(store.path().exists());
    }

    #[test]
    fn test_second_property_preserves_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir, MatchMode::Exact);
        store.upsert(".hero-text", "fontSize", "24px").expect("upsert");
        let first = store.get_all().expect("read");
        assert!(first.contains("font-size: 24px;"));

        store.upsert(".hero-text", "lineHeight", "1.4").expect("upsert");
        let rules = RuleSet::parse(&store.get_all().expect("read"));
        assert_eq!(
            rules.declarations(".hero-text"),
            Some(&["font-size: 24px".to_string(), "line-height: 1.4".to_string()][..])
        );
    }

    #[test]
    fn test_exact_mode_keeps_background_color() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir, MatchMode::Exact);
        store.upsert(".btn", "backgroundColor", "#111").expect("upsert");
        store.upsert(".btn", "color", "#eee").expect("upsert");
        let css = store.get_all().expect("read");
        assert!(css.contains("background-color: #111;"));
        assert!(css.contains("    color: #eee;"));
    }

    #[test]
    fn test_substring_mode_drops_background_color() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir, MatchMode::Substring);
        store.upsert(".btn", "backgroundColor", "#111").expect("upsert");
        store.upsert(".btn", "color", "#eee").expect("upsert");
        let css = store.get_all().expect("read");
        assert!(!css.contains("background-color"));
        assert!(css.contains("    color: #eee;"));
    }

    #[test]
    fn test_vendor_prefixed_property() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir, MatchMode::Exact);
        store
            .upsert(".strip", "webkitMaskImage", "none")
            .expect("upsert");
        assert!(store
            .get_all()
            .expect("read")
            .contains("    -webkit-mask-image: none;\n"));
    }

    #[test]
    fn test_delete_selector() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir, MatchMode::Exact);
        store.upsert(".a", "color", "red").expect("upsert");
        store.upsert("#b", "gap", "4px").expect("upsert");

        store.delete(".a").expect("delete");
        store.delete(".never-there").expect("delete missing");

        let rules = RuleSet::parse(&store.get_all().expect("read"));
        assert_eq!(rules.selectors().collect::<Vec<_>>(), vec!["#b"]);
    }

    #[test]
    fn test_hand_edited_comments_are_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir, MatchMode::Exact);
        std::fs::create_dir_all(store.path().parent().expect("parent")).expect("mkdir");
        std::fs::write(
            store.path(),
            "/* hand written */\n.a { color: red; /* note */ }\n",
        )
        .expect("write");

        store.upsert(".a", "gap", "2px").expect("upsert");
        let rules = RuleSet::parse(&store.get_all().expect("read"));
        assert_eq!(
            rules.declarations(".a"),
            Some(&["color: red".to_string(), "gap: 2px".to_string()][..])
        );
    }
}
