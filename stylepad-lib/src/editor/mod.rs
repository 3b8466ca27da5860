//! Click-to-edit styling over a page: selection, category panels, inline
//! edits and forwarding them for persistence.

pub mod backend;
pub mod fade;
pub mod panels;
pub mod selector;
pub mod session;

pub use backend::{EditorConfig, HttpBackend, StyleBackend, StyleEdit};
pub use session::{EditorMode, Overlay, Selection, StyleEditorSession};
