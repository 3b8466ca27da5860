use std::rc::Rc;

use crate::classify::{classify, Category};
use crate::dom::dom_tree::{Node, NodeRef};
use crate::editor::backend::{EditorConfig, StyleBackend, StyleEdit};
use crate::editor::fade::{FadeControls, FadePreset};
use crate::editor::panels::EditorForm;
use crate::editor::selector::{derive_selector, element_label, is_editor_ui};
use crate::error::EditorError;
use crate::layout::ElementRect;
use crate::page::Page;
use crate::style::property::{clear_inline_style, set_inline_property, to_kebab_case};

/// Shown when the user asks to save everything by hand.
pub const SAVE_ALL_NOTICE: &str = "Styles are auto-saved as you edit when the toggle is ON.\n\nCheck css/editor-custom.css for saved styles.";

/// The element being edited.
#[derive(Debug, Clone)]
pub struct Selection {
    pub element: NodeRef,
    pub category: Category,
    /// Selector edits are saved under.
    pub selector: String,
}

#[derive(Debug, Clone, Default)]
pub enum EditorMode {
    #[default]
    Inactive,
    Active(Option<Selection>),
}

/// A positioned box drawn over the page, in document coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub visible: bool,
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
    /// Tag name of the element underneath.
    pub data_tag: Option<String>,
}

impl Overlay {
    fn over(rect: ElementRect, page: &Page, tag: Option<String>) -> Self {
        Overlay {
            visible: true,
            top: rect.y + page.viewport.scroll_y,
            left: rect.x + page.viewport.scroll_x,
            width: rect.width,
            height: rect.height,
            data_tag: tag,
        }
    }

    fn hide(&mut self) {
        self.visible = false;
    }
}

/// Click-to-edit state over one page.
pub struct StyleEditorSession<B: StyleBackend> {
    page: Page,
    backend: B,
    config: EditorConfig,
    mode: EditorMode,
    form: EditorForm,
    fade: FadeControls,
    highlight: Overlay,
    hover: Overlay,
    auto_save: bool,
}

impl<B: StyleBackend> StyleEditorSession<B> {
    pub fn new(page: Page, backend: B, config: EditorConfig) -> Self {
        let auto_save = config.auto_save;
        StyleEditorSession {
            page,
            backend,
            config,
            mode: EditorMode::Inactive,
            form: EditorForm::new(),
            fade: FadeControls::default(),
            highlight: Overlay::default(),
            hover: Overlay::default(),
            auto_save,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.mode, EditorMode::Active(_))
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn selection(&self) -> Option<&Selection> {
        match &self.mode {
            EditorMode::Active(selection) => selection.as_ref(),
            EditorMode::Inactive => None,
        }
    }

    pub fn form(&self) -> &EditorForm {
        &self.form
    }

    pub fn fade(&self) -> &FadeControls {
        &self.fade
    }

    pub fn highlight(&self) -> &Overlay {
        &self.highlight
    }

    pub fn hover(&self) -> &Overlay {
        &self.hover
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn auto_save(&self) -> bool {
        self.auto_save
    }

    pub fn set_auto_save(&mut self, enabled: bool) {
        self.auto_save = enabled;
    }

    pub fn toggle(&mut self) {
        if self.is_active() {
            self.mode = EditorMode::Inactive;
            self.deselect();
        } else {
            self.mode = EditorMode::Active(None);
        }
    }

    fn deselect(&mut self) {
        if let EditorMode::Active(selection) = &mut self.mode {
            *selection = None;
        }
        self.highlight.hide();
        self.hover.hide();
        self.form.hide_controls();
    }

    /// Handles a click on `target`. Returns true when the editor captured the
    /// click, i.e. the page should not see it.
    pub fn click(&mut self, target: &NodeRef) -> Result<bool, EditorError> {
        if !self.is_active() || is_editor_ui(target) {
            return Ok(false);
        }
        if !matches!(*target.borrow(), Node::Element(_)) {
            return Ok(false);
        }
        self.select(target)?;
        Ok(true)
    }

    fn select(&mut self, target: &NodeRef) -> Result<(), EditorError> {
        let (category, selector, label) = {
            let node = target.borrow();
            let elem = node.as_element().ok_or(EditorError::NoSelection)?;
            (classify(elem), derive_selector(elem), element_label(elem))
        };
        log::debug!("selected {} as {}", label, category);

        self.mode = EditorMode::Active(Some(Selection {
            element: Rc::clone(target),
            category,
            selector,
        }));
        self.refresh_highlight()?;

        self.form.element_label = label;
        self.form.show_for(category);
        self.form.prefill(&self.page.computed_style(target));
        self.hover.hide();
        Ok(())
    }

    /// Pointer moved over `target`.
    pub fn pointer_move(&mut self, target: &NodeRef) -> Result<(), EditorError> {
        if !self.is_active() {
            return Ok(());
        }
        let is_selected = self
            .selection()
            .is_some_and(|s| Rc::ptr_eq(&s.element, target));
        let tag = match &*target.borrow() {
            Node::Element(elem) => Some(elem.tag_name()),
            _ => None,
        };
        if is_selected || tag.is_none() || is_editor_ui(target) {
            self.hover.hide();
            return Ok(());
        }
        let rect = self.page.bounding_rect(target)?;
        self.hover = Overlay::over(rect, &self.page, tag);
        Ok(())
    }

    pub fn scroll_to(&mut self, x: f32, y: f32) -> Result<(), EditorError> {
        self.page.scroll_to(x, y);
        self.refresh_highlight()
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), EditorError> {
        self.page.resize(width, height);
        self.refresh_highlight()
    }

    fn refresh_highlight(&mut self) -> Result<(), EditorError> {
        let Some(selection) = self.selection() else {
            return Ok(());
        };
        let element = Rc::clone(&selection.element);
        let tag = element.borrow().as_element().map(|e| e.tag_name());
        let rect = self.page.bounding_rect(&element)?;
        self.highlight = Overlay::over(rect, &self.page, tag);
        Ok(())
    }

    /// A text or select field changed.
    pub fn commit_input(&mut self, property: &str, value: &str) -> Result<(), EditorError> {
        if self.selection().is_none() {
            return Err(EditorError::NoSelection);
        }
        self.form.set_value(property, value);
        self.apply_style(property, value)
    }

    /// The color picker for `property` changed.
    pub fn commit_color(&mut self, property: &str, hex: &str) -> Result<(), EditorError> {
        if self.selection().is_none() {
            return Err(EditorError::NoSelection);
        }
        self.form.set_picker(property, hex);
        self.apply_style(property, hex)
    }

    /// Writes one property into the selected element's inline style, then
    /// forwards it when auto-save is on. A failed forward never rolls the
    /// inline style back.
    fn apply_style(&mut self, property: &str, value: &str) -> Result<(), EditorError> {
        let Some(selection) = self.selection() else {
            return Err(EditorError::NoSelection);
        };
        let element = Rc::clone(&selection.element);
        let selector = selection.selector.clone();

        if let Some(elem) = element.borrow_mut().as_element_mut() {
            set_inline_property(elem, &to_kebab_case(property), value);
        }
        self.refresh_highlight()?;

        if self.auto_save {
            self.backend.forward(StyleEdit {
                selector,
                property: property.to_string(),
                value: value.to_string(),
            });
        }
        Ok(())
    }

    pub fn apply_fade_preset(&mut self, preset: FadePreset) -> Result<(), EditorError> {
        self.fade.apply_preset(preset);
        self.update_fade_gradient()
    }

    pub fn set_fade_left(&mut self, percent: u8) -> Result<(), EditorError> {
        self.fade.set_left(percent);
        self.update_fade_gradient()
    }

    pub fn set_fade_right(&mut self, percent: u8) -> Result<(), EditorError> {
        self.fade.set_right(percent);
        self.update_fade_gradient()
    }

    fn update_fade_gradient(&mut self) -> Result<(), EditorError> {
        if self.selection().is_none() {
            return Ok(());
        }
        let gradient = self.fade.gradient();
        self.form.set_value("maskImage", &gradient);
        self.apply_style("maskImage", &gradient)?;
        self.apply_style("webkitMaskImage", &gradient)
    }

    /// Drops every inline override on the selected element.
    pub fn reset(&mut self) -> Result<(), EditorError> {
        let element = self
            .selection()
            .map(|s| Rc::clone(&s.element))
            .ok_or(EditorError::NoSelection)?;
        if let Some(elem) = element.borrow_mut().as_element_mut() {
            clear_inline_style(elem);
        }
        self.form.prefill(&self.page.computed_style(&element));
        self.refresh_highlight()
    }

    pub fn save_all(&self) -> &'static str {
        SAVE_ALL_NOTICE
    }

    /// Erases every persisted rule. On success the page is reloaded and the
    /// session starts over; on failure nothing changes.
    pub async fn clear_all_changes(&mut self) -> Result<(), EditorError> {
        self.backend.clear_all().await?;
        self.page.reload()?;
        self.mode = EditorMode::Inactive;
        self.form = EditorForm::new();
        self.fade = FadeControls::default();
        self.highlight = Overlay::default();
        self.hover = Overlay::default();
        self.auto_save = self.config.auto_save;
        log::info!("cleared all saved styles");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        edits: RefCell<Vec<StyleEdit>>,
    }

    impl StyleBackend for Recorder {
        fn forward(&self, edit: StyleEdit) {
            self.edits.borrow_mut().push(edit);
        }

        async fn clear_all(&self) -> Result<(), EditorError> {
            Ok(())
        }
    }

    fn session() -> StyleEditorSession<Recorder> {
        let page = Page::new(
            r#"<body><div class="nwb-editor-panel"><button>x</button></div><p id="t">Hi</p></body>"#,
            &[],
        )
        .expect("page");
        StyleEditorSession::new(page, Recorder::default(), EditorConfig::default())
    }

    #[test]
    fn test_inactive_session_ignores_clicks() {
        let mut s = session();
        let p = s.page().query("#t").expect("p");
        assert!(!s.click(&p).expect("click"));
        assert!(s.selection().is_none());
    }

    #[test]
    fn test_clicks_on_editor_ui_pass_through() {
        let mut s = session();
        s.toggle();
        let button = s.page().query("button").expect("button");
        assert!(!s.click(&button).expect("click"));
        assert!(s.selection().is_none());
    }

    #[test]
    fn test_toggle_off_clears_selection() {
        let mut s = session();
        s.toggle();
        let p = s.page().query("#t").expect("p");
        assert!(s.click(&p).expect("click"));
        assert!(s.highlight().visible);
        s.toggle();
        assert!(!s.is_active());
        assert!(s.selection().is_none());
        assert!(!s.highlight().visible);
        assert!(!s.hover().visible);
    }

    #[test]
    fn test_edit_without_selection_fails() {
        let mut s = session();
        s.toggle();
        assert!(matches!(
            s.commit_input("fontSize", "20px"),
            Err(EditorError::NoSelection)
        ));
        assert!(s.set_fade_left(5).is_ok());
        assert!(s.backend().edits.borrow().is_empty());
    }
}
