use std::collections::HashMap;
use taffy::prelude::*; // Imports TaffyTree, NodeId, Layout, Size, Dimension, AvailableSpace, etc.
use taffy::TaffyError;

use crate::dom::dom_tree::{Document, Node, NodeRef};
use crate::error::LayoutError;
use crate::style::cascade::{Cascade, ComputedStyle};
use crate::style::selector::node_key;

/// Average glyph advance as a fraction of the font size. There is no font
/// rasterizer behind the page model, so text is measured with a fixed advance.
const CHAR_ADVANCE: f32 = 0.5;
const DEFAULT_FONT_SIZE: f32 = 16.0;

/// An element's border box in page coordinates (origin at the top-left of
/// the document, not the viewport).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Border boxes of every element of a document, keyed by node identity.
#[derive(Debug, Default)]
pub struct LayoutMap {
    rects: HashMap<usize, ElementRect>,
}

impl LayoutMap {
    pub fn rect(&self, node: &NodeRef) -> Option<ElementRect> {
        self.rects.get(&node_key(node)).copied()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Text leaf context: what to measure and how big it is.
#[derive(Debug, Clone)]
struct TextContext {
    text: String,
    font_size: f32,
    line_height: f32,
}

/// Builds a Taffy layout tree from the DOM and computes the layout.
/// `available_width` is the viewport width in CSS pixels.
pub fn build_layout(
    document: &Document,
    cascade: &Cascade,
    available_width: f32,
) -> Result<LayoutMap, LayoutError> {
    let mut tree: TaffyTree<TextContext> = TaffyTree::new();
    let mut element_ids = Vec::new();
    let root_id = convert_dom_to_taffy(
        &mut tree,
        &document.root,
        None,
        cascade,
        available_width,
        &mut element_ids,
    )?
    .ok_or_else(|| LayoutError::Taffy("document produced no layout node".to_string()))?;

    tree.compute_layout_with_measure(
        root_id,
        Size {
            width: AvailableSpace::Definite(available_width),
            height: AvailableSpace::MaxContent,
        },
        |known, avail, _node_id, ctx: Option<&mut TextContext>, _style: &Style| -> Size<f32> {
            match ctx {
                Some(text) => measure_text(text, known, avail),
                None => Size::ZERO,
            }
        },
    )
    .map_err(taffy_error)?;

    let mut absolute = HashMap::new();
    place(&tree, root_id, 0.0, 0.0, &mut absolute)?;

    let rects = element_ids
        .into_iter()
        .filter_map(|(key, id)| absolute.get(&id).map(|rect| (key, *rect)))
        .collect();
    Ok(LayoutMap { rects })
}

fn taffy_error(e: TaffyError) -> LayoutError {
    LayoutError::Taffy(format!("{:?}", e))
}

/// Recursively converts a DOM node into a Taffy node. Whitespace-only text
/// produces no node.
fn convert_dom_to_taffy(
    tree: &mut TaffyTree<TextContext>,
    dom_node: &NodeRef,
    parent_style: Option<&ComputedStyle>,
    cascade: &Cascade,
    available_width: f32,
    element_ids: &mut Vec<(usize, NodeId)>,
) -> Result<Option<NodeId>, LayoutError> {
    match &*dom_node.borrow() {
        Node::DocumentRoot(root) => {
            let mut children_ids = Vec::new();
            for child in &root.children {
                if let Some(id) =
                    convert_dom_to_taffy(tree, child, None, cascade, available_width, element_ids)?
                {
                    children_ids.push(id);
                }
            }
            let style = Style {
                display: Display::Block,
                size: Size {
                    width: Dimension::Length(available_width),
                    height: Dimension::Auto,
                },
                ..Default::default()
            };
            tree.new_with_children(style, &children_ids)
                .map(Some)
                .map_err(taffy_error)
        }
        Node::Element(_) => {
            let computed = cascade.compute(dom_node, parent_style);
            let mut children_ids = Vec::new();
            for child in dom_node.borrow().children() {
                if let Some(id) = convert_dom_to_taffy(
                    tree,
                    child,
                    Some(&computed),
                    cascade,
                    available_width,
                    element_ids,
                )? {
                    children_ids.push(id);
                }
            }
            let id = tree
                .new_with_children(to_taffy_style(&computed), &children_ids)
                .map_err(taffy_error)?;
            element_ids.push((node_key(dom_node), id));
            Ok(Some(id))
        }
        Node::Text(text) => {
            let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if collapsed.is_empty() {
                return Ok(None);
            }
            let font_size = parent_style
                .and_then(|s| parse_px(s.get("font-size")))
                .unwrap_or(DEFAULT_FONT_SIZE);
            let line_height = parent_style
                .map(|s| resolve_line_height(s.get("line-height"), font_size))
                .unwrap_or(font_size * 1.2);
            let context = TextContext {
                text: collapsed,
                font_size,
                line_height,
            };
            tree.new_leaf_with_context(Style::default(), context)
                .map(Some)
                .map_err(taffy_error)
        }
    }
}

/// Walks the computed tree accumulating offsets into page coordinates.
fn place(
    tree: &TaffyTree<TextContext>,
    id: NodeId,
    origin_x: f32,
    origin_y: f32,
    out: &mut HashMap<NodeId, ElementRect>,
) -> Result<(), LayoutError> {
    let layout = tree.layout(id).map_err(taffy_error)?;
    let rect = ElementRect {
        x: origin_x + layout.location.x,
        y: origin_y + layout.location.y,
        width: layout.size.width,
        height: layout.size.height,
    };
    out.insert(id, rect);
    for child in tree.children(id).map_err(taffy_error)? {
        place(tree, child, rect.x, rect.y, out)?;
    }
    Ok(())
}

fn measure_text(
    ctx: &TextContext,
    known: Size<Option<f32>>,
    avail: Size<AvailableSpace>,
) -> Size<f32> {
    let char_width = ctx.font_size * CHAR_ADVANCE;
    let char_count = ctx.text.chars().count() as f32;
    let full_width = char_count * char_width;
    let longest_word = ctx
        .text
        .split(' ')
        .map(|w| w.chars().count())
        .max()
        .unwrap_or(0) as f32
        * char_width;

    let max_width = known.width.unwrap_or(match avail.width {
        AvailableSpace::Definite(w) => w,
        AvailableSpace::MinContent => longest_word,
        AvailableSpace::MaxContent => full_width,
    });
    let chars_per_line = (max_width / char_width).floor().max(1.0);
    let lines = (char_count / chars_per_line).ceil().max(1.0);
    Size {
        width: full_width.min(max_width.max(longest_word)),
        height: known.height.unwrap_or(lines * ctx.line_height),
    }
}

/// `12px` -> 12.0. Other units are not resolved.
pub fn parse_px(value: &str) -> Option<f32> {
    let value = value.trim();
    if value == "0" {
        return Some(0.0);
    }
    value.strip_suffix("px")?.trim().parse().ok()
}

fn resolve_line_height(value: &str, font_size: f32) -> f32 {
    if let Some(px) = parse_px(value) {
        return px;
    }
    match value.trim().parse::<f32>() {
        Ok(factor) => factor * font_size,
        Err(_) => font_size * 1.2,
    }
}

fn parse_dimension(value: &str) -> Dimension {
    let value = value.trim();
    if let Some(px) = parse_px(value) {
        return Dimension::Length(px);
    }
    match value.strip_suffix('%').and_then(|v| v.trim().parse::<f32>().ok()) {
        Some(pct) => Dimension::Percent(pct / 100.0),
        None => Dimension::Auto,
    }
}

fn parse_length_percentage(value: &str) -> LengthPercentage {
    match parse_dimension(value) {
        Dimension::Length(px) => LengthPercentage::Length(px),
        Dimension::Percent(p) => LengthPercentage::Percent(p),
        _ => LengthPercentage::Length(0.0),
    }
}

fn parse_length_percentage_auto(value: &str) -> LengthPercentageAuto {
    match parse_dimension(value) {
        Dimension::Length(px) => LengthPercentageAuto::Length(px),
        Dimension::Percent(p) => LengthPercentageAuto::Percent(p),
        _ if value.trim() == "auto" => LengthPercentageAuto::Auto,
        _ => LengthPercentageAuto::Length(0.0),
    }
}

/// Expands a 1-4 value box shorthand (`10px 20px`) into top, right, bottom,
/// left, then applies any longhands present in the style.
fn box_sides<'a>(style: &'a ComputedStyle, property: &str) -> [&'a str; 4] {
    let parts: Vec<&str> = style.get(property).split_whitespace().collect();
    let mut sides = match parts.as_slice() {
        [all] => [*all; 4],
        [v, h] => [*v, *h, *v, *h],
        [t, h, b] => [*t, *h, *b, *h],
        [t, r, b, l, ..] => [*t, *r, *b, *l],
        [] => ["0px"; 4],
    };
    for (i, side) in ["top", "right", "bottom", "left"].iter().enumerate() {
        if let Some(value) = style.properties.get(&format!("{}-{}", property, side)) {
            sides[i] = value.as_str();
        }
    }
    sides
}

/// Maps the resolved CSS onto a taffy style. Inline formatting is not
/// modelled: inline and inline-block boxes are laid out as blocks.
fn to_taffy_style(style: &ComputedStyle) -> Style {
    let display = match style.get("display") {
        "none" => Display::None,
        "flex" | "inline-flex" => Display::Flex,
        "grid" | "inline-grid" => Display::Grid,
        _ => Display::Block,
    };

    let padding = box_sides(style, "padding");
    let margin = box_sides(style, "margin");
    let gap = parse_length_percentage(style.get("gap"));

    Style {
        display,
        size: Size {
            width: parse_dimension(style.get("width")),
            height: parse_dimension(style.get("height")),
        },
        max_size: Size {
            width: parse_dimension(style.get("max-width")),
            height: parse_dimension(style.get("max-height")),
        },
        padding: taffy::Rect {
            top: parse_length_percentage(padding[0]),
            right: parse_length_percentage(padding[1]),
            bottom: parse_length_percentage(padding[2]),
            left: parse_length_percentage(padding[3]),
        },
        margin: taffy::Rect {
            top: parse_length_percentage_auto(margin[0]),
            right: parse_length_percentage_auto(margin[1]),
            bottom: parse_length_percentage_auto(margin[2]),
            left: parse_length_percentage_auto(margin[3]),
        },
        gap: Size {
            width: gap,
            height: gap,
        },
        flex_direction: match style.get("flex-direction") {
            "column" => FlexDirection::Column,
            "row-reverse" => FlexDirection::RowReverse,
            "column-reverse" => FlexDirection::ColumnReverse,
            _ => FlexDirection::Row,
        },
        justify_content: match style.get("justify-content") {
            "flex-start" | "start" => Some(JustifyContent::FlexStart),
            "center" => Some(JustifyContent::Center),
            "flex-end" | "end" => Some(JustifyContent::FlexEnd),
            "space-between" => Some(JustifyContent::SpaceBetween),
            "space-around" => Some(JustifyContent::SpaceAround),
            "space-evenly" => Some(JustifyContent::SpaceEvenly),
            _ => None,
        },
        align_items: match style.get("align-items") {
            "flex-start" | "start" => Some(AlignItems::FlexStart),
            "center" => Some(AlignItems::Center),
            "flex-end" | "end" => Some(AlignItems::FlexEnd),
            "stretch" => Some(AlignItems::Stretch),
            "baseline" => Some(AlignItems::Baseline),
            _ => None,
        },
        ..Default::default()
    }
}
