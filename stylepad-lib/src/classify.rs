//! Coarse element classification used to pick the editor panel.

use std::fmt;

use crate::dom::dom_tree::ElementNode;

/// What kind of thing an element looks like, as far as the editor cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Text,
    Image,
    Button,
    Carousel,
    Navigation,
    Input,
    Icon,
    Container,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Text,
        Category::Image,
        Category::Button,
        Category::Carousel,
        Category::Navigation,
        Category::Input,
        Category::Icon,
        Category::Container,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Text => "text",
            Category::Image => "image",
            Category::Button => "button",
            Category::Carousel => "carousel",
            Category::Navigation => "navigation",
            Category::Input => "input",
            Category::Icon => "icon",
            Category::Container => "container",
        }
    }

    /// Uppercase label shown in the editor header.
    pub fn badge(self) -> String {
        self.as_str().to_ascii_uppercase()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const TEXT_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "p", "span", "a", "label", "li"];
const INPUT_TAGS: &[&str] = &["input", "textarea", "select"];
const CAROUSEL_HINTS: &[&str] = &["loop", "carousel", "slider", "infinite"];

/// The facts a rule may look at.
struct Probe<'a> {
    tag: &'a str,
    classes: &'a str,
}

type Rule = (fn(&Probe<'_>) -> bool, Category);

// Order matters: the first matching rule wins, and several rules can match the
// same element (a `<nav class="btn">` is a button).
const RULES: &[Rule] = &[
    (|p: &Probe<'_>| TEXT_TAGS.iter().any(|t| *t == p.tag), Category::Text),
    (|p: &Probe<'_>| p.tag == "img", Category::Image),
    (|p: &Probe<'_>| p.tag == "button" || p.classes.contains("btn"), Category::Button),
    (
        |p: &Probe<'_>| CAROUSEL_HINTS.iter().any(|hint| p.classes.contains(hint)),
        Category::Carousel,
    ),
    (|p: &Probe<'_>| p.tag == "nav" || p.classes.contains("nav"), Category::Navigation),
    (|p: &Probe<'_>| INPUT_TAGS.iter().any(|t| *t == p.tag), Category::Input),
    (
        |p: &Probe<'_>| p.tag == "svg" || p.tag == "i" || p.classes.contains("icon"),
        Category::Icon,
    ),
];

/// Classifies by tag name and raw class attribute.
pub fn classify_parts(tag: &str, class_attr: &str) -> Category {
    let tag = tag.to_ascii_lowercase();
    let probe = Probe {
        tag: &tag,
        classes: class_attr,
    };
    RULES
        .iter()
        .find(|(matches, _)| matches(&probe))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Container)
}

pub fn classify(element: &ElementNode) -> Category {
    classify_parts(&element.tag, element.class_attr())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_tags() {
        for tag in ["h1", "h6", "p", "span", "a", "label", "li"] {
            assert_eq!(classify_parts(tag, ""), Category::Text, "{tag}");
        }
    }

    #[test]
    fn test_button_beats_icon() {
        assert_eq!(classify_parts("button", "icon"), Category::Button);
        assert_eq!(classify_parts("div", "icon-btn"), Category::Button);
    }

    #[test]
    fn test_text_beats_button_class() {
        assert_eq!(classify_parts("a", "btn btn-primary"), Category::Text);
    }

    #[test]
    fn test_button_class_beats_nav() {
        assert_eq!(classify_parts("nav", "btn-bar"), Category::Button);
        assert_eq!(classify_parts("nav", ""), Category::Navigation);
        assert_eq!(classify_parts("ul", "navbar"), Category::Navigation);
    }

    #[test]
    fn test_carousel_hints_are_substrings() {
        assert_eq!(classify_parts("div", "logo-loop"), Category::Carousel);
        assert_eq!(classify_parts("section", "testimonial-slider"), Category::Carousel);
        assert_eq!(classify_parts("div", "infinite-scroll"), Category::Carousel);
        // carousel is checked before navigation
        assert_eq!(classify_parts("div", "carousel-nav"), Category::Carousel);
    }

    #[test]
    fn test_inputs_icons_and_default() {
        assert_eq!(classify_parts("TEXTAREA", ""), Category::Input);
        assert_eq!(classify_parts("svg", ""), Category::Icon);
        assert_eq!(classify_parts("i", "fa fa-star"), Category::Icon);
        assert_eq!(classify_parts("div", "social-icon"), Category::Icon);
        assert_eq!(classify_parts("div", ""), Category::Container);
        assert_eq!(classify_parts("section", "hero"), Category::Container);
    }

    #[test]
    fn test_img_with_button_class_is_image() {
        assert_eq!(classify_parts("img", "btn"), Category::Image);
    }

    #[test]
    fn test_badge() {
        assert_eq!(Category::Text.badge(), "TEXT");
        assert_eq!(Category::Navigation.to_string(), "navigation");
    }
}
