use std::rc::Rc;

use crate::dom::dom_tree::{ElementNode, Node, NodeRef};

/// A compound selector: optional tag, optional id and any number of classes,
/// e.g. `p.hero-text#intro`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

/// Supported combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Descendant combinator (a space).
    Descendant,
    /// Child combinator (`>`).
    Child,
}

/// A complex selector composed of a key compound selector and a list of ancestor parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub key: CompoundSelector,
    /// Ancestors with their combinators, in right-to-left order.
    pub ancestors: Vec<(Combinator, CompoundSelector)>,
}

/// Parse a compound selector such as `div.red#header`. Returns `None` for
/// anything outside the supported subset (attributes, pseudo-classes).
pub fn parse_compound_selector(selector: &str) -> Option<CompoundSelector> {
    if selector.is_empty() || selector.contains(['[', ':', '+', '~', ',', '(']) {
        return None;
    }

    let mut compound = CompoundSelector::default();
    let mut chars = selector.chars().peekable();
    let mut buffer = String::new();

    // If first char is alphabetic or '*' assume tag.
    if let Some(&ch) = chars.peek() {
        if ch.is_alphabetic() || ch == '*' {
            while let Some(&ch) = chars.peek() {
                if ch == '#' || ch == '.' {
                    break;
                }
                buffer.push(ch);
                chars.next();
            }
            if buffer != "*" {
                compound.tag = Some(buffer.to_ascii_lowercase());
            }
            buffer.clear();
        }
    }

    while let Some(marker) = chars.next() {
        while let Some(&ch) = chars.peek() {
            if ch == '.' || ch == '#' {
                break;
            }
            buffer.push(ch);
            chars.next();
        }
        if buffer.is_empty() {
            return None;
        }
        match marker {
            '#' => compound.id = Some(std::mem::take(&mut buffer)),
            '.' => compound.classes.push(std::mem::take(&mut buffer)),
            _ => return None,
        }
    }

    Some(compound)
}

/// Parse a complex selector (`nav > a.active`, `.hero p`). Tokens are
/// expected to be separated by whitespace, which is how stylesheets are
/// printed after parsing.
pub fn parse_selector(selector: &str) -> Option<ComplexSelector> {
    let mut tokens = selector.split_whitespace().rev();
    let key = parse_compound_selector(tokens.next()?)?;
    let mut ancestors = Vec::new();
    // Walking right to left, each compound is paired with the combinator
    // that links it to its right-hand neighbour.
    let mut combinator = Combinator::Descendant;
    for token in tokens {
        if token == ">" {
            combinator = Combinator::Child;
            continue;
        }
        ancestors.push((combinator, parse_compound_selector(token)?));
        combinator = Combinator::Descendant;
    }
    if combinator == Combinator::Child {
        // dangling `>` at the start
        return None;
    }
    Some(ComplexSelector { key, ancestors })
}

/// Specificity as (id_count, class_count, tag_count).
pub fn compute_specificity(selector: &ComplexSelector) -> (u32, u32, u32) {
    std::iter::once(&selector.key)
        .chain(selector.ancestors.iter().map(|(_, c)| c))
        .fold((0, 0, 0), |acc, c| {
            (
                acc.0 + c.id.is_some() as u32,
                acc.1 + c.classes.len() as u32,
                acc.2 + c.tag.is_some() as u32,
            )
        })
}

pub fn compound_matches(compound: &CompoundSelector, elem: &ElementNode) -> bool {
    if let Some(tag) = &compound.tag {
        if !elem.tag.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if elem.id() != Some(id.as_str()) {
            return false;
        }
    }
    compound.classes.iter().all(|class| elem.has_class(class))
}

/// True if `node` is an element matched by `selector`.
pub fn matches(selector: &ComplexSelector, node: &NodeRef) -> bool {
    let parent = match &*node.borrow() {
        Node::Element(elem) => {
            if !compound_matches(&selector.key, elem) {
                return false;
            }
            elem.parent()
        }
        _ => return false,
    };
    matches_ancestors(&selector.ancestors, parent)
}

fn matches_ancestors(ancestors: &[(Combinator, CompoundSelector)], start: Option<NodeRef>) -> bool {
    let Some(((combinator, compound), rest)) = ancestors.split_first() else {
        return true;
    };
    let mut current = start;
    while let Some(node) = current {
        let (hit, parent) = match &*node.borrow() {
            Node::Element(elem) => (compound_matches(compound, elem), elem.parent()),
            _ => return false,
        };
        if hit && matches_ancestors(rest, parent.clone()) {
            return true;
        }
        if *combinator == Combinator::Child {
            return false;
        }
        current = parent;
    }
    false
}

/// Identity key for a node handle, stable for the lifetime of the node.
pub fn node_key(node: &NodeRef) -> usize {
    Rc::as_ptr(node) as *const () as usize
}
