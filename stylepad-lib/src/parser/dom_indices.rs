use std::collections::HashMap;
use std::rc::Rc;

use crate::dom::dom_tree::{Document, Node, NodeRef};

/// Indexes for looking elements up by the same simple selectors the editor
/// derives (`#id`, `.class`, `tag`).
#[derive(Debug, Default)]
pub struct DomIndices {
    /// Maps an element's "id" attribute to the first node carrying it.
    pub id_map: HashMap<String, NodeRef>,
    /// Maps a class name to all nodes that have that class, in document order.
    pub class_map: HashMap<String, Vec<NodeRef>>,
    /// Maps a lowercase tag name (e.g., "div") to all nodes with that tag.
    pub tag_map: HashMap<String, Vec<NodeRef>>,
}

impl DomIndices {
    /// Build the indices for the entire document.
    pub fn build(document: &Document) -> Self {
        let mut indices = DomIndices::default();
        Self::traverse(&document.root, &mut indices);
        indices
    }

    fn traverse(node: &NodeRef, indices: &mut DomIndices) {
        match &*node.borrow() {
            Node::DocumentRoot(root) => {
                for child in &root.children {
                    Self::traverse(child, indices);
                }
            }
            Node::Element(elem) => {
                indices
                    .tag_map
                    .entry(elem.tag_name())
                    .or_default()
                    .push(Rc::clone(node));

                if let Some(id_value) = elem.id() {
                    indices
                        .id_map
                        .entry(id_value.to_string())
                        .or_insert_with(|| Rc::clone(node));
                }
                for class in elem.class_list() {
                    indices
                        .class_map
                        .entry(class.to_string())
                        .or_default()
                        .push(Rc::clone(node));
                }
                for child in &elem.children {
                    Self::traverse(child, indices);
                }
            }
            Node::Text(_) => {}
        }
    }

    /// First element matching a simple selector, like `querySelector` for the
    /// three forms the editor produces.
    pub fn query(&self, selector: &str) -> Option<NodeRef> {
        self.query_all(selector).into_iter().next()
    }

    pub fn query_all(&self, selector: &str) -> Vec<NodeRef> {
        let trimmed = selector.trim();
        if let Some(id_part) = trimmed.strip_prefix('#') {
            return self.id_map.get(id_part).cloned().into_iter().collect();
        }
        if let Some(class_part) = trimmed.strip_prefix('.') {
            return self.class_map.get(class_part).cloned().unwrap_or_default();
        }
        self.tag_map
            .get(&trimmed.to_ascii_lowercase())
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::html::create_dom_tree;

    #[test]
    fn test_query_by_id_class_and_tag() {
        let document = create_dom_tree(
            r#"<body><div id="hero" class="section wide"><p class="hero-text">A</p><p>B</p></div></body>"#,
        );
        let indices = DomIndices::build(&document);

        let hero = indices.query("#hero").expect("id lookup");
        assert_eq!(hero.borrow().as_element().map(|e| e.tag.clone()), Some("div".into()));
        assert_eq!(indices.query_all(".wide").len(), 1);
        assert_eq!(indices.query_all("P").len(), 2);
        assert!(indices.query(".missing").is_none());
    }
}
