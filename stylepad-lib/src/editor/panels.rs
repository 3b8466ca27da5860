//! Category panels and the form state behind them.

use crate::classify::Category;
use crate::style::cascade::ComputedStyle;
use crate::style::color::to_hex;
use crate::style::property::to_kebab_case;

/// Badge text shown before anything has been selected.
pub const EMPTY_BADGE: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Text,
    Image,
    Button,
    Carousel,
    Navigation,
    Input,
    Icon,
    Container,
    /// Spacing controls, visible for every selection.
    Common,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Fixed choices; `""` is the unset entry.
    Select(&'static [&'static str]),
    /// Text field paired with a color picker.
    Color,
}

/// A form field as declared by its panel.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Camel-case property name, the form the wire uses.
    pub property: &'static str,
    pub kind: FieldKind,
}

const fn text(property: &'static str) -> FieldSpec {
    FieldSpec {
        property,
        kind: FieldKind::Text,
    }
}

const fn select(property: &'static str, options: &'static [&'static str]) -> FieldSpec {
    FieldSpec {
        property,
        kind: FieldKind::Select(options),
    }
}

const fn color(property: &'static str) -> FieldSpec {
    FieldSpec {
        property,
        kind: FieldKind::Color,
    }
}

const FONT_WEIGHTS: &[&str] = &["", "300", "400", "500", "600", "700", "800"];
const TEXT_ALIGN: &[&str] = &["", "left", "center", "right"];
const TEXT_TRANSFORM: &[&str] = &["", "none", "uppercase", "capitalize"];
const OBJECT_FIT: &[&str] = &["", "cover", "contain", "fill", "none"];
const OBJECT_POSITION: &[&str] = &["", "center", "top", "bottom"];
const DISPLAY: &[&str] = &["", "block", "flex", "grid", "none"];
const FLEX_DIRECTION: &[&str] = &["", "row", "column"];
const JUSTIFY: &[&str] = &["", "flex-start", "center", "flex-end", "space-between"];
const ALIGN: &[&str] = &["", "flex-start", "center", "flex-end", "stretch"];
const ANIMATION_DIRECTION: &[&str] = &["", "normal", "reverse", "alternate"];
const TIMING: &[&str] = &["", "linear", "ease", "ease-in", "ease-out"];
const PLAY_STATE: &[&str] = &["running", "paused"];

const TEXT_FIELDS: &[FieldSpec] = &[
    text("fontSize"),
    select("fontWeight", FONT_WEIGHTS),
    text("lineHeight"),
    text("letterSpacing"),
    color("color"),
    select("textAlign", TEXT_ALIGN),
    select("textTransform", TEXT_TRANSFORM),
];

const IMAGE_FIELDS: &[FieldSpec] = &[
    select("objectFit", OBJECT_FIT),
    select("objectPosition", OBJECT_POSITION),
    text("borderRadius"),
    text("opacity"),
    text("filter"),
];

const CONTAINER_FIELDS: &[FieldSpec] = &[
    select("display", DISPLAY),
    select("flexDirection", FLEX_DIRECTION),
    select("justifyContent", JUSTIFY),
    select("alignItems", ALIGN),
    text("gap"),
    text("width"),
    text("height"),
    text("maxWidth"),
    text("maxHeight"),
    color("backgroundColor"),
];

const CAROUSEL_FIELDS: &[FieldSpec] = &[
    text("animationDuration"),
    select("animationDirection", ANIMATION_DIRECTION),
    select("animationTimingFunction", TIMING),
    select("animationPlayState", PLAY_STATE),
    text("maskImage"),
    text("webkitMaskImage"),
];

const BUTTON_FIELDS: &[FieldSpec] = &[
    color("backgroundColor"),
    color("color"),
    text("padding"),
    text("borderRadius"),
    text("border"),
];

const NAVIGATION_FIELDS: &[FieldSpec] = &[
    select("display", DISPLAY),
    text("gap"),
    select("justifyContent", JUSTIFY),
    color("backgroundColor"),
];

const INPUT_FIELDS: &[FieldSpec] = &[
    text("fontSize"),
    color("color"),
    color("backgroundColor"),
    text("border"),
    text("borderRadius"),
];

const ICON_FIELDS: &[FieldSpec] = &[text("width"), text("height"), color("color"), text("opacity")];

const COMMON_FIELDS: &[FieldSpec] = &[text("padding"), text("margin")];

impl PanelKind {
    pub const ALL: [PanelKind; 9] = [
        PanelKind::Text,
        PanelKind::Image,
        PanelKind::Button,
        PanelKind::Carousel,
        PanelKind::Navigation,
        PanelKind::Input,
        PanelKind::Icon,
        PanelKind::Container,
        PanelKind::Common,
    ];

    pub fn for_category(category: Category) -> PanelKind {
        match category {
            Category::Text => PanelKind::Text,
            Category::Image => PanelKind::Image,
            Category::Button => PanelKind::Button,
            Category::Carousel => PanelKind::Carousel,
            Category::Navigation => PanelKind::Navigation,
            Category::Input => PanelKind::Input,
            Category::Icon => PanelKind::Icon,
            Category::Container => PanelKind::Container,
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            PanelKind::Text => TEXT_FIELDS,
            PanelKind::Image => IMAGE_FIELDS,
            PanelKind::Button => BUTTON_FIELDS,
            PanelKind::Carousel => CAROUSEL_FIELDS,
            PanelKind::Navigation => NAVIGATION_FIELDS,
            PanelKind::Input => INPUT_FIELDS,
            PanelKind::Icon => ICON_FIELDS,
            PanelKind::Container => CONTAINER_FIELDS,
            PanelKind::Common => COMMON_FIELDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub property: &'static str,
    pub kind: FieldKind,
    pub value: String,
    /// `#rrggbb`, only for color fields.
    pub picker: Option<String>,
}

impl FormField {
    fn new(spec: &FieldSpec) -> Self {
        FormField {
            property: spec.property,
            kind: spec.kind,
            value: String::new(),
            picker: match spec.kind {
                FieldKind::Color => Some(to_hex("")),
                _ => None,
            },
        }
    }

    /// Loads a resolved value. A select whose options do not include the
    /// value shows the unset entry.
    fn load(&mut self, resolved: &str) {
        match self.kind {
            FieldKind::Select(options) => {
                self.value = if options.iter().any(|o| *o == resolved) {
                    resolved.to_string()
                } else {
                    String::new()
                };
            }
            FieldKind::Color => {
                self.value = resolved.to_string();
                self.picker = Some(to_hex(resolved));
            }
            FieldKind::Text => self.value = resolved.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub kind: PanelKind,
    pub visible: bool,
    pub fields: Vec<FormField>,
}

/// Everything the editor panel displays.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorForm {
    pub panels: Vec<Panel>,
    pub badge: String,
    pub element_label: String,
    /// False while the "nothing selected" placeholder is shown.
    pub controls_visible: bool,
}

impl Default for EditorForm {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorForm {
    pub fn new() -> Self {
        let panels = PanelKind::ALL
            .iter()
            .map(|kind| Panel {
                kind: *kind,
                visible: false,
                fields: kind.fields().iter().map(FormField::new).collect(),
            })
            .collect();
        EditorForm {
            panels,
            badge: EMPTY_BADGE.to_string(),
            element_label: String::new(),
            controls_visible: false,
        }
    }

    /// Shows the category's panel plus the common panel and hides the rest.
    pub fn show_for(&mut self, category: Category) {
        let wanted = PanelKind::for_category(category);
        for panel in &mut self.panels {
            panel.visible = panel.kind == wanted || panel.kind == PanelKind::Common;
        }
        self.badge = category.badge();
        self.controls_visible = true;
    }

    /// Back to the placeholder. The badge keeps its last value.
    pub fn hide_controls(&mut self) {
        self.controls_visible = false;
    }

    /// Pre-fills every field, visible or not, from a resolved style.
    pub fn prefill(&mut self, style: &ComputedStyle) {
        for field in self.panels.iter_mut().flat_map(|p| p.fields.iter_mut()) {
            field.load(style.get(&to_kebab_case(field.property)));
        }
    }

    /// Writes a typed value into every field bound to `property`.
    pub fn set_value(&mut self, property: &str, value: &str) {
        for field in self.fields_for_mut(property) {
            field.value = value.to_string();
        }
    }

    /// Writes a picked color into every picker bound to `property` and syncs
    /// the paired text field.
    pub fn set_picker(&mut self, property: &str, hex: &str) {
        for field in self.fields_for_mut(property) {
            field.value = hex.to_string();
            if field.kind == FieldKind::Color {
                field.picker = Some(hex.to_string());
            }
        }
    }

    fn fields_for_mut<'a>(
        &'a mut self,
        property: &'a str,
    ) -> impl Iterator<Item = &'a mut FormField> + 'a {
        self.panels
            .iter_mut()
            .flat_map(|p| p.fields.iter_mut())
            .filter(move |f| f.property == property)
    }

    pub fn panel(&self, kind: PanelKind) -> Option<&Panel> {
        self.panels.iter().find(|p| p.kind == kind)
    }

    pub fn visible_panels(&self) -> Vec<PanelKind> {
        self.panels
            .iter()
            .filter(|p| p.visible)
            .map(|p| p.kind)
            .collect()
    }

    /// The field for `property`, preferring one on a visible panel.
    pub fn field(&self, property: &str) -> Option<&FormField> {
        let mut candidates = self
            .panels
            .iter()
            .flat_map(|p| p.fields.iter().map(move |f| (p.visible, f)))
            .filter(|(_, f)| f.property == property);
        let first = candidates.next()?;
        if first.0 {
            return Some(first.1);
        }
        Some(
            candidates
                .find(|(visible, _)| *visible)
                .map(|(_, f)| f)
                .unwrap_or(first.1),
        )
    }
}
