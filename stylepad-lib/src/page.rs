//! The in-process stand-in for a browser tab: a parsed document, its author
//! stylesheets and a viewport.

use crate::dom::dom_tree::{Document, NodeRef};
use crate::error::{LayoutError, StyleError};
use crate::layout::{build_layout, ElementRect};
use crate::parser::dom_indices::DomIndices;
use crate::parser::html::create_dom_tree;
use crate::style::cascade::{self, Cascade, ComputedStyle};
use crate::style::owned_css::OwnedStylesheet;

/// Visible area of the page and how far it is scrolled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scroll_x: f32,
    pub scroll_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 1280.0,
            height: 800.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

pub struct Page {
    html_source: String,
    css_sources: Vec<String>,
    document: Document,
    indices: DomIndices,
    cascade: Cascade,
    pub viewport: Viewport,
}

impl Page {
    /// Parses `html` and the stylesheets linked from it, in link order.
    pub fn new(html: &str, stylesheets: &[&str]) -> Result<Self, StyleError> {
        let css_sources: Vec<String> = stylesheets.iter().map(|s| s.to_string()).collect();
        let cascade = Cascade::new(&parse_stylesheets(&css_sources)?);
        let document = create_dom_tree(html);
        let indices = DomIndices::build(&document);
        Ok(Page {
            html_source: html.to_string(),
            css_sources,
            document,
            indices,
            cascade,
            viewport: Viewport::default(),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn query(&self, selector: &str) -> Option<NodeRef> {
        self.indices.query(selector)
    }

    pub fn query_all(&self, selector: &str) -> Vec<NodeRef> {
        self.indices.query_all(selector)
    }

    /// Resolved style of `element`, computed top-down through its ancestors.
    pub fn computed_style(&self, element: &NodeRef) -> ComputedStyle {
        let mut chain = vec![element.clone()];
        while let Some(parent) = chain
            .last()
            .and_then(|n| n.borrow().as_element().and_then(|e| e.parent()))
        {
            chain.push(parent);
        }

        let mut style: Option<ComputedStyle> = None;
        for node in chain.iter().rev() {
            style = Some(self.cascade.compute(node, style.as_ref()));
        }
        style.unwrap_or_default()
    }

    /// Border box of `element` relative to the viewport, like
    /// `getBoundingClientRect`. Elements that are not laid out (detached or
    /// stale handles) report an empty rect.
    pub fn bounding_rect(&self, element: &NodeRef) -> Result<ElementRect, LayoutError> {
        let layout = build_layout(&self.document, &self.cascade, self.viewport.width)?;
        let rect = layout.rect(element).unwrap_or_default();
        Ok(ElementRect {
            x: rect.x - self.viewport.scroll_x,
            y: rect.y - self.viewport.scroll_y,
            ..rect
        })
    }

    pub fn scroll_to(&mut self, x: f32, y: f32) {
        self.viewport.scroll_x = x.max(0.0);
        self.viewport.scroll_y = y.max(0.0);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    /// Re-parses the original sources. Inline edits and held element handles
    /// from before the reload no longer refer to the page.
    pub fn reload(&mut self) -> Result<(), StyleError> {
        log::debug!("reloading page ({} stylesheets)", self.css_sources.len());
        self.cascade = Cascade::new(&parse_stylesheets(&self.css_sources)?);
        self.document = create_dom_tree(&self.html_source);
        self.indices = DomIndices::build(&self.document);
        Ok(())
    }
}

fn parse_stylesheets(sources: &[String]) -> Result<OwnedStylesheet, StyleError> {
    let mut combined = OwnedStylesheet::default();
    for source in sources {
        combined.extend(cascade::parse(source)?);
    }
    Ok(combined)
}
