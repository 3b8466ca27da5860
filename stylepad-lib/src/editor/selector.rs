//! How the editor names elements: the selector edits are saved under and the
//! label shown in the panel header.

use crate::dom::dom_tree::{closest, ElementNode, NodeRef};

/// Class prefix reserved for the editor's own markup.
pub const EDITOR_CLASS_PREFIX: &str = "nwb-";

/// Classes carried by the editor panel, toggle button and overlays.
pub const EDITOR_UI_CLASSES: &[&str] = &[
    "nwb-editor-panel",
    "nwb-editor-toggle",
    "nwb-editor-highlight",
    "nwb-editor-hover-highlight",
];

fn page_classes(element: &ElementNode) -> impl Iterator<Item = &str> {
    element
        .class_list()
        .filter(|class| !class.starts_with(EDITOR_CLASS_PREFIX))
}

/// Selector an edit is persisted under: `#id`, else the first page class,
/// else the lowercase tag name.
pub fn derive_selector(element: &ElementNode) -> String {
    if let Some(id) = element.id() {
        return format!("#{}", id);
    }
    match page_classes(element).next() {
        Some(class) => format!(".{}", class),
        None => element.tag_name(),
    }
}

/// Header label, e.g. `p#intro.hero-text.big`.
pub fn element_label(element: &ElementNode) -> String {
    let mut label = element.tag_name();
    if let Some(id) = element.id() {
        label.push('#');
        label.push_str(id);
    }
    for class in page_classes(element) {
        label.push('.');
        label.push_str(class);
    }
    label
}

/// True for the editor's own UI and anything inside it.
pub fn is_editor_ui(node: &NodeRef) -> bool {
    closest(node, |elem| {
        EDITOR_UI_CLASSES.iter().any(|class| elem.has_class(class))
    })
    .is_some()
}
