//! The persisted stylesheet as an ordered selector -> declarations mapping.
//!
//! The lexer only understands flat `selector { ... }` blocks, which is all
//! [`RuleSet::serialize`] ever writes. Nested blocks and at-rules are not
//! supported.
//!
//! Values are written as given. A value containing `;` or `}` (a
//! `data:` URL, a quoted brace) is split or cut short when the file is
//! parsed again.

use once_cell::sync::Lazy;
use regex::Regex;

pub const HEADER: &str =
    "/* NWB Visual Editor - Custom Styles */\n/* Auto-generated - Do not edit manually */\n";

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("static regex"));
static BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^{]+)\{([^}]*)\}").expect("static regex"));

/// How an upsert decides which existing declarations it replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Same property name.
    #[default]
    Exact,
    /// Declaration text contains the property name anywhere. Upserting
    /// `color` also drops `background-color`.
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleSet {
    rules: Vec<(String, Vec<String>)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads blocks out of stylesheet text. A selector seen twice keeps its
    /// first position and its last body.
    pub fn parse(css: &str) -> Self {
        let stripped = COMMENT.replace_all(css, "");
        let mut set = RuleSet::new();
        for caps in BLOCK.captures_iter(&stripped) {
            let selector = caps[1].trim();
            if selector.is_empty() {
                continue;
            }
            let declarations = split_declarations(&caps[2]);
            match set.position(selector) {
                Some(i) => set.rules[i].1 = declarations,
                None => set.rules.push((selector.to_string(), declarations)),
            }
        }
        set
    }

    pub fn serialize(&self) -> String {
        let mut css = String::from(HEADER);
        css.push('\n');
        for (selector, declarations) in &self.rules {
            css.push_str(selector);
            css.push_str(" {\n");
            for declaration in declarations {
                css.push_str("    ");
                css.push_str(declaration);
                css.push_str(";\n");
            }
            css.push_str("}\n\n");
        }
        css
    }

    fn position(&self, selector: &str) -> Option<usize> {
        self.rules.iter().position(|(s, _)| s == selector)
    }

    /// Sets `css_property: value` on `selector`, creating the block at the end
    /// if needed. Replaced declarations are removed and the new one is
    /// appended last.
    pub fn upsert_declaration(
        &mut self,
        selector: &str,
        css_property: &str,
        value: &str,
        mode: MatchMode,
    ) {
        let index = match self.position(selector) {
            Some(i) => i,
            None => {
                self.rules.push((selector.to_string(), Vec::new()));
                self.rules.len() - 1
            }
        };
        let declarations = &mut self.rules[index].1;
        declarations.retain(|decl| !replaces(decl, css_property, mode));
        declarations.push(format!("{}: {}", css_property, value));
    }

    /// Drops a whole block. Returns whether it existed.
    pub fn remove(&mut self, selector: &str) -> bool {
        match self.position(selector) {
            Some(i) => {
                self.rules.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn declarations(&self, selector: &str) -> Option<&[String]> {
        self.position(selector).map(|i| self.rules[i].1.as_slice())
    }

    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(s, _)| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn split_declarations(body: &str) -> Vec<String> {
    body.split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

fn replaces(declaration: &str, css_property: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Exact => {
            let key = declaration
                .split_once(':')
                .map(|(key, _)| key)
                .unwrap_or(declaration);
            key.trim().eq_ignore_ascii_case(css_property)
        }
        MatchMode::Substring => declaration.contains(css_property),
    }
}
