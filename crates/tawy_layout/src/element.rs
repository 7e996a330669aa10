//! Declarative element builder with HTML serialization
//!
//! Provides a fluent builder API for describing markup as data:
//! ```rust
//! use tawy_layout::prelude::*;
//!
//! let ui = div()
//!     .class("card")
//!     .attr("data-slide", "0")
//!     .child(h1().text("Hello <world>"));
//!
//! assert_eq!(
//!     ui.to_html(),
//!     r#"<div class="card" data-slide="0"><h1>Hello &lt;world&gt;</h1></div>"#
//! );
//! ```
//!
//! Text and attribute values are always escaped, so data flowing into a
//! builder can never change the structure of the produced markup.

use indexmap::IndexMap;
use smallvec::SmallVec;

/// Elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &["img", "br", "hr", "input", "meta", "link"];

/// A markup element and its subtree
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    tag: String,
    classes: SmallVec<[String; 4]>,
    attrs: IndexMap<String, String>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// Create an element with the given tag name
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder
    // =========================================================================

    /// Set the `id` attribute
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Add one or more whitespace separated classes
    pub fn class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            if !self.classes.iter().any(|c| c == class) {
                self.classes.push(class.to_string());
            }
        }
        self
    }

    /// Add classes only when `condition` holds
    pub fn class_if(self, condition: bool, classes: &str) -> Self {
        if condition {
            self.class(classes)
        } else {
            self
        }
    }

    /// Set an attribute, replacing an earlier value
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Set the inline `style` attribute
    pub fn style(self, style: impl Into<String>) -> Self {
        self.attr("style", style)
    }

    /// Set the text content, rendered before any children
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Apply `f` only when `condition` holds
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition {
            f(self)
        } else {
            self
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn get_id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn get_children(&self) -> &[Element] {
        &self.children
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }

    /// Depth-first search for descendants (including self) with a class
    pub fn find_by_class<'a>(&'a self, class: &str, out: &mut Vec<&'a Element>) {
        if self.has_class(class) {
            out.push(self);
        }
        for child in &self.children {
            child.find_by_class(class, out);
        }
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Serialize this element and its subtree to HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);

        if !self.classes.is_empty() {
            out.push_str(" class=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(
                &self.classes.join(" "),
            ));
            out.push('"');
        }

        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(value));
            out.push('"');
        }

        if self.is_void() {
            out.push_str(" />");
            return;
        }
        out.push('>');

        if let Some(text) = &self.text {
            out.push_str(&html_escape::encode_text(text));
        }
        for child in &self.children {
            child.write_html(out);
        }

        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// Create an element with an arbitrary tag
pub fn el(tag: impl Into<String>) -> Element {
    Element::new(tag)
}

pub fn div() -> Element {
    Element::new("div")
}

pub fn section() -> Element {
    Element::new("section")
}

pub fn span() -> Element {
    Element::new("span")
}

/// A `<button>` with `type="button"` so it never submits an enclosing form
pub fn button() -> Element {
    Element::new("button").attr("type", "button")
}

pub fn h1() -> Element {
    Element::new("h1")
}

pub fn p() -> Element {
    Element::new("p")
}

pub fn img() -> Element {
    Element::new("img")
}

/// An `<i>` element, used for icon font glyphs
pub fn i() -> Element {
    Element::new("i")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes_are_deduplicated() {
        let el = div().class("slide active").class("active");
        assert_eq!(el.classes(), &["slide".to_string(), "active".to_string()]);
        assert_eq!(el.to_html(), r#"<div class="slide active"></div>"#);
    }

    #[test]
    fn test_class_if() {
        assert!(span().class_if(true, "active").has_class("active"));
        assert!(!span().class_if(false, "active").has_class("active"));
    }

    #[test]
    fn test_attribute_order_is_insertion_order() {
        let el = img().attr("src", "a.png").attr("alt", "A");
        assert_eq!(el.to_html(), r#"<img src="a.png" alt="A" />"#);
    }

    #[test]
    fn test_escaping_keeps_structure() {
        let el = p()
            .attr("data-link", r#""><script>"#)
            .text("</p><script>alert(1)</script>");
        let html = el.to_html();
        assert!(!html.contains("<script>"));
        assert!(html.starts_with("<p data-link=\""));
        assert!(html.ends_with("</p>"));
    }

    #[test]
    fn test_when() {
        let el = div().when(false, |d| d.child(span())).when(true, |d| d.id("x"));
        assert!(el.get_children().is_empty());
        assert_eq!(el.get_id(), Some("x"));
    }

    #[test]
    fn test_find_by_class() {
        let ui = div()
            .class("carousel")
            .child(div().class("slide"))
            .child(div().child(div().class("slide")));
        let mut found = Vec::new();
        ui.find_by_class("slide", &mut found);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_button_defaults_to_type_button() {
        assert_eq!(button().text("Go").to_html(), r#"<button type="button">Go</button>"#);
    }
}
