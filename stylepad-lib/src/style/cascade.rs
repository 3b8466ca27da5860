//! Resolves the style of an element from the page stylesheets and its inline
//! style, the way `getComputedStyle` would report it for the properties the
//! editor cares about.

use crate::dom::dom_tree::{ElementNode, Node, NodeRef};
use crate::error::StyleError;
use crate::style::color::{to_rgb_notation, COLOR_PROPERTIES};
use crate::style::owned_css::{OwnedDeclaration, OwnedRule, OwnedStylesheet};
use crate::style::property::inline_style;
use crate::style::selector::{compute_specificity, matches, parse_selector, ComplexSelector};
use lightningcss::printer::PrinterOptions;
use lightningcss::rules::{style::StyleRule, CssRule};
use lightningcss::stylesheet::{ParserOptions, StyleSheet as LightningStyleSheet};
use lightningcss::traits::ToCss;
use std::collections::HashMap;

/// Final set of CSS properties an element gets.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct ComputedStyle {
    pub properties: HashMap<String, String>,
}

impl ComputedStyle {
    pub fn new() -> Self {
        ComputedStyle {
            properties: HashMap::new(),
        }
    }

    /// Value for a CSS property name (`font-size`), empty if unknown.
    pub fn get(&self, property: &str) -> &str {
        self.properties
            .get(property)
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Properties a child takes from its parent when nothing sets them.
const INHERITED: &[&str] = &[
    "color",
    "font-size",
    "font-weight",
    "font-family",
    "line-height",
    "letter-spacing",
    "text-align",
    "text-transform",
];

/// Initial values, as a browser reports them for an unstyled element.
const INITIAL_VALUES: &[(&str, &str)] = &[
    ("color", "rgb(0, 0, 0)"),
    ("font-size", "16px"),
    ("font-weight", "400"),
    ("line-height", "normal"),
    ("letter-spacing", "normal"),
    ("text-align", "start"),
    ("text-transform", "none"),
    ("background-color", "rgba(0, 0, 0, 0)"),
    ("object-fit", "fill"),
    ("object-position", "50% 50%"),
    ("border", "0px none rgb(0, 0, 0)"),
    ("border-radius", "0px"),
    ("opacity", "1"),
    ("filter", "none"),
    ("flex-direction", "row"),
    ("justify-content", "normal"),
    ("align-items", "normal"),
    ("gap", "normal"),
    ("width", "auto"),
    ("height", "auto"),
    ("max-width", "none"),
    ("max-height", "none"),
    ("padding", "0px"),
    ("margin", "0px"),
    ("animation-duration", "0s"),
    ("animation-direction", "normal"),
    ("animation-timing-function", "ease"),
    ("animation-play-state", "running"),
    ("mask-image", "none"),
    ("-webkit-mask-image", "none"),
];

const BLOCK_TAGS: &[&str] = &[
    "html", "body", "div", "section", "header", "footer", "main", "nav", "article", "aside",
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "form", "figure", "blockquote",
];
const HIDDEN_TAGS: &[&str] = &[
    "head", "script", "style", "meta", "link", "title", "template", "noscript",
];

/// User agent tweaks on top of the initial values.
fn user_agent_style(elem: &ElementNode) -> Vec<(&'static str, &'static str)> {
    let tag = elem.tag_name();
    let is_one_of = |tags: &[&str]| tags.iter().any(|t| *t == tag);
    let display = if is_one_of(HIDDEN_TAGS) {
        "none"
    } else if tag == "li" {
        "list-item"
    } else if is_one_of(BLOCK_TAGS) {
        "block"
    } else if matches!(tag.as_str(), "button" | "input" | "select" | "textarea") {
        "inline-block"
    } else {
        "inline"
    };

    let mut ua = vec![("display", display)];
    match tag.as_str() {
        "h1" => ua.extend([("font-size", "32px"), ("font-weight", "700")]),
        "h2" => ua.extend([("font-size", "24px"), ("font-weight", "700")]),
        "h3" | "h4" | "h5" | "h6" => ua.push(("font-weight", "700")),
        "body" => ua.push(("margin", "8px")),
        "p" => ua.push(("margin", "16px 0px")),
        _ => {}
    }
    ua
}

pub fn parse(css_snippet: &str) -> Result<OwnedStylesheet, StyleError> {
    parse_and_own_css(css_snippet)
}

/// Parse a raw CSS string (LightningCSS) and convert it to a fully-owned stylesheet.
fn parse_and_own_css(css_text: &str) -> Result<OwnedStylesheet, StyleError> {
    let sheet = LightningStyleSheet::parse(css_text, ParserOptions::default())
        .map_err(|e| StyleError::Parse(e.to_string()))?;

    let mut owned_rules = Vec::new();
    for rule in &sheet.rules.0 {
        match rule {
            CssRule::Style(style_rule) => owned_rules.push(convert_style_rule(style_rule)),
            CssRule::Media(media_rule) => {
                // Flattened: the page is always "on screen".
                for inner_rule in &media_rule.rules.0 {
                    if let CssRule::Style(sr) = inner_rule {
                        owned_rules.push(convert_style_rule(sr));
                    }
                }
            }
            _ => {}
        }
    }

    Ok(OwnedStylesheet { rules: owned_rules })
}

/// Copies a single StyleRule's selectors + declarations into an OwnedRule.
fn convert_style_rule(style_rule: &StyleRule<'_>) -> OwnedRule {
    let selectors = style_rule
        .selectors
        .0
        .iter()
        .filter_map(|selector| selector.to_css_string(PrinterOptions::default()).ok())
        .collect();

    let block = &style_rule.declarations;
    let normal = block.declarations.iter().map(|p| (p, false));
    let important = block.important_declarations.iter().map(|p| (p, true));

    let declarations = normal
        .chain(important)
        .filter_map(|(property, important)| {
            let value = property
                .value_to_css_string(PrinterOptions::default())
                .ok()?;
            Some(OwnedDeclaration {
                property: property.property_id().name().to_string(),
                value,
                important,
            })
        })
        .collect();

    OwnedRule {
        selectors,
        declarations,
    }
}

/// One selector of one rule, ready to match.
#[derive(Debug, Clone)]
struct CompiledRule {
    selector: ComplexSelector,
    specificity: (u32, u32, u32),
    order: usize,
    declarations: Vec<OwnedDeclaration>,
}

/// The author stylesheets of a page, with selectors parsed once.
#[derive(Debug, Clone, Default)]
pub struct Cascade {
    rules: Vec<CompiledRule>,
}

impl Cascade {
    pub fn new(stylesheet: &OwnedStylesheet) -> Self {
        let mut rules = Vec::new();
        for (order, rule) in stylesheet.rules.iter().enumerate() {
            for sel_str in &rule.selectors {
                // Selectors outside the supported subset never match.
                let Some(selector) = parse_selector(sel_str) else {
                    log::debug!("skipping unsupported selector {:?}", sel_str);
                    continue;
                };
                rules.push(CompiledRule {
                    specificity: compute_specificity(&selector),
                    selector,
                    order,
                    declarations: rule.declarations.clone(),
                });
            }
        }
        // Stable sort keeps source order within equal specificity.
        rules.sort_by_key(|r| (r.specificity, r.order));
        Cascade { rules }
    }

    /// Resolved style of `node`. `parent_style` supplies inherited values; pass
    /// `None` for the root element.
    pub fn compute(&self, node: &NodeRef, parent_style: Option<&ComputedStyle>) -> ComputedStyle {
        let mut final_style = ComputedStyle::new();
        let node_ref = node.borrow();
        let Node::Element(elem) = &*node_ref else {
            return final_style;
        };

        for (property, value) in INITIAL_VALUES {
            final_style
                .properties
                .insert(property.to_string(), value.to_string());
        }
        if let Some(parent) = parent_style {
            for property in INHERITED {
                if let Some(value) = parent.properties.get(*property) {
                    final_style
                        .properties
                        .insert(property.to_string(), value.clone());
                }
            }
        }
        for (property, value) in user_agent_style(elem) {
            final_style
                .properties
                .insert(property.to_string(), value.to_string());
        }

        let matched: Vec<&CompiledRule> = self
            .rules
            .iter()
            .filter(|rule| matches(&rule.selector, node))
            .collect();

        for rule in &matched {
            for decl in rule.declarations.iter().filter(|d| !d.important) {
                final_style
                    .properties
                    .insert(decl.property.clone(), decl.value.clone());
            }
        }
        for (property, value) in inline_style(elem) {
            final_style.properties.insert(property, value);
        }
        for rule in &matched {
            for decl in rule.declarations.iter().filter(|d| d.important) {
                final_style
                    .properties
                    .insert(decl.property.clone(), decl.value.clone());
            }
        }

        for property in COLOR_PROPERTIES {
            if let Some(value) = final_style.properties.get_mut(*property) {
                if let Some(rgb) = to_rgb_notation(value) {
                    *value = rgb;
                }
            }
        }
        final_style
    }
}
