//! Property names and inline `style` attribute handling.

use crate::dom::dom_tree::ElementNode;

const VENDOR_PREFIXES: &[&str] = &["webkit-", "moz-", "ms-"];

/// Rewrites a camel-case property name (`fontSize`, as used on the wire and
/// by the form) into its CSS text form (`font-size`).
///
/// Names that already contain a hyphen are only lowercased. Vendor prefixed
/// names get their leading hyphen back: `webkitMaskImage` is
/// `-webkit-mask-image`. Files written by the older Node service hold the
/// unprefixed `webkit-mask-image` instead; exact matching treats the two as
/// different properties, so such a file can end up carrying both.
pub fn to_kebab_case(property: &str) -> String {
    let property = property.trim();
    if property.contains('-') {
        return property.to_ascii_lowercase();
    }

    let mut out = String::with_capacity(property.len() + 4);
    for ch in property.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }

    if VENDOR_PREFIXES.iter().any(|prefix| out.starts_with(prefix)) {
        out.insert(0, '-');
    }
    out
}

/// Splits declaration text (`a: b; c: d`) into `(property, value)` pairs.
/// Entries without a colon are skipped; property names are lowercased.
pub fn parse_declarations(text: &str) -> Vec<(String, String)> {
    text.split(';')
        .filter_map(|decl| {
            let (property, value) = decl.split_once(':')?;
            let property = property.trim();
            if property.is_empty() {
                return None;
            }
            Some((property.to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect()
}

/// Serializes declarations the way `element.style.cssText` reads.
pub fn serialize_declarations(declarations: &[(String, String)]) -> String {
    declarations
        .iter()
        .map(|(property, value)| format!("{}: {};", property, value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Inline declarations of an element, in attribute order.
pub fn inline_style(element: &ElementNode) -> Vec<(String, String)> {
    element
        .attr("style")
        .map(parse_declarations)
        .unwrap_or_default()
}

/// Sets one inline property (CSS text form). An empty value removes it.
pub fn set_inline_property(element: &mut ElementNode, css_property: &str, value: &str) {
    let mut declarations = inline_style(element);
    let value = value.trim();
    let position = declarations.iter().position(|(p, _)| p == css_property);
    match (position, value.is_empty()) {
        (Some(i), false) => declarations[i].1 = value.to_string(),
        (Some(i), true) => {
            declarations.remove(i);
        }
        (None, false) => declarations.push((css_property.to_string(), value.to_string())),
        (None, true) => {}
    }
    element.set_attr("style", serialize_declarations(&declarations));
}

/// Drops every inline override at once.
pub fn clear_inline_style(element: &mut ElementNode) {
    element.remove_attr("style");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kebab_case() {
        assert_eq!(to_kebab_case("fontSize"), "font-size");
        assert_eq!(to_kebab_case("backgroundColor"), "background-color");
        assert_eq!(to_kebab_case("animationTimingFunction"), "animation-timing-function");
        assert_eq!(to_kebab_case("color"), "color");
        assert_eq!(to_kebab_case("background-color"), "background-color");
    }

    #[test]
    fn test_vendor_prefix_keeps_leading_hyphen() {
        assert_eq!(to_kebab_case("webkitMaskImage"), "-webkit-mask-image");
        assert_eq!(to_kebab_case("-webkit-mask-image"), "-webkit-mask-image");
        assert_eq!(to_kebab_case("maskImage"), "mask-image");
    }

    #[test]
    fn test_parse_declarations_skips_junk() {
        assert_eq!(
            parse_declarations(" color: red ;; bogus; Font-Size:12px"),
            vec![
                ("color".to_string(), "red".to_string()),
                ("font-size".to_string(), "12px".to_string()),
            ]
        );
    }

    #[test]
    fn test_values_may_contain_colons() {
        assert_eq!(
            parse_declarations("background-image: url(http://x/y.png)"),
            vec![(
                "background-image".to_string(),
                "url(http://x/y.png)".to_string()
            )]
        );
    }
}
