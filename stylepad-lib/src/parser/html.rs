//! Parses HTML into the crate's DOM tree.
//!
//! html5ever does the tokenizing and tree construction; `PageTreeSink` receives
//! its callbacks and builds the `crate::dom::dom_tree` nodes, keeping parent
//! links so the editor can walk up from a clicked element.

use crate::dom::dom_tree::{self, Node, NodeRef};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    interface::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink},
    Attribute, LocalName, Namespace, QualName,
};
use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

/// Creates a DOM tree from the provided HTML content.
pub fn create_dom_tree(html_content: &str) -> dom_tree::Document {
    let tree_sink = PageTreeSink::new();
    html5ever::parse_document(tree_sink, Default::default()).one(html_content.to_string())
}

/// Tree sink that builds a `dom_tree::Document`.
pub struct PageTreeSink {
    document: dom_tree::Document,
    quirks_mode: RefCell<QuirksMode>,
}

impl PageTreeSink {
    pub fn new() -> Self {
        Self {
            document: dom_tree::new_document(),
            quirks_mode: RefCell::new(QuirksMode::NoQuirks),
        }
    }

    fn make_node(child: NodeOrText<NodeRef>) -> NodeRef {
        match child {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => Rc::new(RefCell::new(Node::Text(text.to_string()))),
        }
    }

    fn set_parent(child: &NodeRef, parent: &NodeRef) {
        if let Node::Element(ref mut elem) = *child.borrow_mut() {
            elem.parent = Some(Rc::downgrade(parent));
        }
    }

    /// Merges `text` into the node at `index - 1` when that node is already a
    /// text node. Returns true if merged.
    fn merge_text(children: &[NodeRef], index: usize, text: &str) -> bool {
        if index == 0 {
            return false;
        }
        if let Node::Text(ref mut existing) = *children[index - 1].borrow_mut() {
            existing.push_str(text);
            return true;
        }
        false
    }

    fn parent_of(node: &NodeRef) -> Option<NodeRef> {
        node.borrow().as_element().and_then(|e| e.parent())
    }
}

impl Default for PageTreeSink {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct PageElemName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for PageElemName {
    fn local_name(&self) -> &LocalName {
        &self.local
    }

    fn ns(&self) -> &Namespace {
        &self.ns
    }
}

impl TreeSink for PageTreeSink {
    type Handle = NodeRef;
    type Output = dom_tree::Document;
    type ElemName<'a>
        = PageElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self.document
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        log::debug!("HTML parse error: {}", msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.document.root.clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        match &*target.borrow() {
            Node::Element(elem) => PageElemName {
                ns: elem.qual_name.ns.clone(),
                local: elem.qual_name.local.clone(),
            },
            // html5ever only asks for names of handles it created as elements.
            _ => panic!("elem_name called on non-element node"),
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let mut element = dom_tree::ElementNode::new(name.local.to_string(), name);
        element.attributes = attrs
            .into_iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect();
        Rc::new(RefCell::new(Node::Element(element)))
    }

    // Comments are not part of the editable page; an empty text node keeps the
    // tree builder happy without adding content.
    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        Rc::new(RefCell::new(Node::Text(String::new())))
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        Rc::new(RefCell::new(Node::Text(String::new())))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        if let NodeOrText::AppendText(ref text) = child {
            let parent_ref = parent.borrow();
            let children = parent_ref.children();
            if Self::merge_text(children, children.len(), text) {
                return;
            }
        }

        let child = Self::make_node(child);
        Self::set_parent(&child, parent);
        if let Some(children) = parent.borrow_mut().children_mut() {
            children.push(child);
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if Self::parent_of(element).is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        *self.document.doctype.borrow_mut() = Some(dom_tree::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        });
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        *self.quirks_mode.borrow_mut() = mode;
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let Some(parent) = Self::parent_of(sibling) else {
            return;
        };
        let index = match parent
            .borrow()
            .children()
            .iter()
            .position(|c| Rc::ptr_eq(c, sibling))
        {
            Some(index) => index,
            None => return,
        };

        if let NodeOrText::AppendText(ref text) = child {
            if Self::merge_text(parent.borrow().children(), index, text) {
                return;
            }
        }

        let child = Self::make_node(child);
        Self::set_parent(&child, &parent);
        if let Some(children) = parent.borrow_mut().children_mut() {
            children.insert(index, child);
        };
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        if let Node::Element(elem_node) = &mut *target.borrow_mut() {
            for attr in attrs {
                let key = attr.name.local.to_string();
                if elem_node.attr(&key).is_none() {
                    elem_node.attributes.push((key, attr.value.to_string()));
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        if let Some(parent) = Self::parent_of(target) {
            if let Some(children) = parent.borrow_mut().children_mut() {
                children.retain(|c| !Rc::ptr_eq(c, target));
            }
        }
        if let Node::Element(ref mut elem) = *target.borrow_mut() {
            elem.parent = None;
        }
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let moved = match node.borrow_mut().children_mut() {
            Some(children) => std::mem::take(children),
            None => return,
        };
        for child in &moved {
            Self::set_parent(child, new_parent);
        }
        if let Some(children) = new_parent.borrow_mut().children_mut() {
            children.extend(moved);
        }
    }
}
