use html5ever::QualName;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub mod dom_tree {
    use super::*;

    /// Shared handle to a node in the tree. This is what the editor holds on to
    /// when an element is selected.
    pub type NodeRef = Rc<RefCell<Node>>;

    #[derive(Debug, Clone)]
    pub enum Node {
        DocumentRoot(DocumentRootNode),
        Element(ElementNode),
        Text(String),
    }

    #[derive(Debug, Clone)]
    pub struct DocumentRootNode {
        pub children: Vec<NodeRef>,
    }

    #[derive(Debug, Clone)]
    pub struct ElementNode {
        pub tag: String,
        pub qual_name: QualName,
        pub attributes: Vec<(String, String)>,
        pub children: Vec<NodeRef>,
        pub parent: Option<Weak<RefCell<Node>>>,
    }

    #[derive(Debug)]
    pub struct Document {
        pub root: NodeRef,
        pub doctype: RefCell<Option<Doctype>>,
    }

    #[derive(Debug)]
    pub struct Doctype {
        pub name: String,
        pub public_id: String,
        pub system_id: String,
    }

    impl DocumentRootNode {
        pub fn new() -> Self {
            DocumentRootNode {
                children: Vec::new(),
            }
        }
    }

    impl Default for DocumentRootNode {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Node {
        pub fn children(&self) -> &[NodeRef] {
            match self {
                Node::DocumentRoot(root) => &root.children,
                Node::Element(elem) => &elem.children,
                Node::Text(_) => &[],
            }
        }

        pub fn children_mut(&mut self) -> Option<&mut Vec<NodeRef>> {
            match self {
                Node::DocumentRoot(root) => Some(&mut root.children),
                Node::Element(elem) => Some(&mut elem.children),
                Node::Text(_) => None,
            }
        }

        pub fn as_element(&self) -> Option<&ElementNode> {
            match self {
                Node::Element(elem) => Some(elem),
                _ => None,
            }
        }

        pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
            match self {
                Node::Element(elem) => Some(elem),
                _ => None,
            }
        }
    }

    impl ElementNode {
        pub fn new(tag: String, qual_name: QualName) -> Self {
            ElementNode {
                tag,
                qual_name,
                attributes: Vec::new(),
                children: Vec::new(),
                parent: None,
            }
        }

        /// Lowercase tag name, the way `tagName.toLowerCase()` reads in a browser.
        pub fn tag_name(&self) -> String {
            self.tag.to_ascii_lowercase()
        }

        pub fn attr(&self, name: &str) -> Option<&str> {
            self.attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }

        /// Sets an attribute, replacing an existing value in place so attribute
        /// order is stable.
        pub fn set_attr(&mut self, name: &str, value: String) {
            match self
                .attributes
                .iter_mut()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
            {
                Some((_, existing)) => *existing = value,
                None => self.attributes.push((name.to_string(), value)),
            }
        }

        pub fn remove_attr(&mut self, name: &str) {
            self.attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        }

        pub fn id(&self) -> Option<&str> {
            self.attr("id").filter(|id| !id.is_empty())
        }

        /// Raw class attribute; a missing attribute reads as the empty string.
        pub fn class_attr(&self) -> &str {
            self.attr("class").unwrap_or("")
        }

        pub fn class_list(&self) -> impl Iterator<Item = &str> {
            self.class_attr().split_whitespace()
        }

        pub fn has_class(&self, class_name: &str) -> bool {
            self.class_list().any(|c| c == class_name)
        }

        pub fn parent(&self) -> Option<NodeRef> {
            self.parent.as_ref().and_then(Weak::upgrade)
        }
    }

    impl Document {
        /// All element nodes in document order.
        pub fn elements(&self) -> Vec<NodeRef> {
            let mut out = Vec::new();
            collect_elements(&self.root, &mut out);
            out
        }
    }

    fn collect_elements(node: &NodeRef, out: &mut Vec<NodeRef>) {
        if matches!(*node.borrow(), Node::Element(_)) {
            out.push(Rc::clone(node));
        }
        for child in node.borrow().children() {
            collect_elements(child, out);
        }
    }

    /// Walks from `node` up through its ancestors, returning the first element
    /// for which `pred` holds. The node itself is tested first, like
    /// `Element.closest`.
    pub fn closest(node: &NodeRef, pred: impl Fn(&ElementNode) -> bool) -> Option<NodeRef> {
        let mut current = Some(Rc::clone(node));
        while let Some(handle) = current {
            let next = match &*handle.borrow() {
                Node::Element(elem) => {
                    if pred(elem) {
                        None
                    } else {
                        Some(elem.parent())
                    }
                }
                _ => Some(None),
            };
            match next {
                None => return Some(handle),
                Some(parent) => current = parent,
            }
        }
        None
    }

    pub fn new_document() -> Document {
        Document {
            root: Rc::new(RefCell::new(Node::DocumentRoot(DocumentRootNode::new()))),
            doctype: RefCell::new(None),
        }
    }
}
