// A fully-owned page stylesheet: plain style rules only, so it can outlive the
// source text lightningcss borrowed from.
use std::fmt;

#[derive(Debug, Default, Clone)]
pub struct OwnedStylesheet {
    pub rules: Vec<OwnedRule>,
}

#[derive(Debug, Clone)]
pub struct OwnedRule {
    /// Selector list as written, split on commas: `["h1", ".hero p"]`.
    pub selectors: Vec<String>,
    /// Declarations in source order; later entries win inside one rule.
    pub declarations: Vec<OwnedDeclaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OwnedDeclaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl OwnedStylesheet {
    /// Appends another sheet's rules after this one's, as if the second
    /// stylesheet were linked later in the page.
    pub fn extend(&mut self, other: OwnedStylesheet) {
        self.rules.extend(other.rules);
    }
}

impl fmt::Display for OwnedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {{", self.selectors.join(", "))?;
        for decl in &self.declarations {
            if decl.important {
                writeln!(f, "  {}: {} !important;", decl.property, decl.value)?;
            } else {
                writeln!(f, "  {}: {};", decl.property, decl.value)?;
            }
        }
        write!(f, "}}")
    }
}
