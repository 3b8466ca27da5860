use crate::classify::{classify, Category};
use crate::dom::dom_tree::NodeRef;
use crate::editor::selector::{derive_selector, element_label, is_editor_ui};
use crate::error::StyleError;
use crate::page::Page;

pub mod report {
    use super::*;

    /// One line of the inspection report.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ElementSummary {
        pub depth: usize,
        pub label: String,
        pub selector: String,
        pub category: Category,
    }

    /// Every page element (editor UI excluded) with the selector and category
    /// the editor would use for it, in document order.
    pub fn inspect(
        html_content: &str,
        stylesheets: &[&str],
    ) -> Result<Vec<ElementSummary>, StyleError> {
        let page = Page::new(html_content, stylesheets)?;
        let summaries = page
            .document()
            .elements()
            .iter()
            .filter(|node| !is_editor_ui(node))
            .filter_map(|node| {
                let depth = depth_of(node);
                let borrowed = node.borrow();
                let elem = borrowed.as_element()?;
                Some(ElementSummary {
                    depth,
                    label: element_label(elem),
                    selector: derive_selector(elem),
                    category: classify(elem),
                })
            })
            .collect();
        Ok(summaries)
    }

    fn depth_of(node: &NodeRef) -> usize {
        let mut depth: usize = 0;
        let mut current = node.borrow().as_element().and_then(|e| e.parent());
        while let Some(parent) = current {
            depth += 1;
            current = parent.borrow().as_element().and_then(|e| e.parent());
        }
        depth.saturating_sub(1)
    }

    /// Indented text rendering, one element per line.
    pub fn render(summaries: &[ElementSummary]) -> String {
        summaries
            .iter()
            .map(|s| {
                format!(
                    "{}{}  [{}]  {}\n",
                    "  ".repeat(s.depth),
                    s.label,
                    s.category.badge(),
                    s.selector
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::report::*;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inspect_page() {
        let html_str = r#"<!DOCTYPE html>
<html>
<body>
  <nav class="main-nav"><a href="/">Home</a></nav>
  <div class="hero infinite-loop"><img src="x.png"></div>
  <button class="cta">Go</button>
  <div class="nwb-editor-panel"><input></div>
</body>
</html>"#;

        let summaries = inspect(html_str, &[]).expect("inspect");
        let categories: Vec<(String, Category)> = summaries
            .iter()
            .map(|s| (s.selector.clone(), s.category))
            .collect();
        assert_eq!(
            categories,
            vec![
                ("html".to_string(), Category::Container),
                ("head".to_string(), Category::Container),
                ("body".to_string(), Category::Container),
                (".main-nav".to_string(), Category::Navigation),
                ("a".to_string(), Category::Text),
                (".hero".to_string(), Category::Carousel),
                ("img".to_string(), Category::Image),
                (".cta".to_string(), Category::Button),
            ]
        );

        let text = render(&summaries);
        assert!(text.contains("    nav.main-nav  [NAVIGATION]  .main-nav\n"));
    }
}
