//! Markup trees and the views that build them.
//!
//! Views are plain functions returning [`Node`] values. Rendering to HTML
//! happens once, at the edge, through [`Node::render`].

use std::fmt::{self, Write};

pub mod layout;
pub mod shared;

pub use layout::{app_view, in_layout, left_side, right_side};
pub use shared::{
    coded_no_example_view, coded_view, coded_with_picture_view, coded_with_text_example_view,
    fix_docs_view, lined_mockup_code,
};

/// Elements that never have children or a closing tag.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// A node of a markup tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Escaped on render
    Text(String),
    /// Trusted, pre-rendered HTML
    Raw(String),
    Fragment(Vec<Node>),
}

/// An element with attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// Start building an element.
pub fn el(tag: &'static str) -> Element {
    Element {
        tag,
        attrs: Vec::new(),
        children: Vec::new(),
    }
}

/// A text node.
pub fn text(s: impl Into<String>) -> Node {
    Node::Text(s.into())
}

/// Render markdown prose into a trusted HTML node.
pub fn markdown(content: &str) -> Node {
    use pulldown_cmark::{html, Options, Parser};

    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(content, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    Node::Raw(html_output)
}

impl Element {
    /// Set an attribute, replacing any previous value.
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
        self
    }

    /// Add classes; repeated calls combine rather than replace.
    pub fn class(mut self, classes: &str) -> Self {
        match self.attrs.iter_mut().find(|(n, _)| n == "class") {
            Some((_, v)) => {
                v.push(' ');
                v.push_str(classes);
            }
            None => self.attrs.push(("class".to_string(), classes.to_string())),
        }
        self
    }

    /// Add a class only when `condition` holds.
    pub fn class_if(self, condition: bool, classes: &str) -> Self {
        if condition {
            self.class(classes)
        } else {
            self
        }
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, s: impl Into<String>) -> Self {
        self.child(Node::Text(s.into()))
    }

    /// Value of an attribute, if set.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn write_html(&self, buf: &mut impl Write) -> fmt::Result {
        write!(buf, "<{}", self.tag)?;
        for (name, value) in &self.attrs {
            write!(
                buf,
                " {}=\"{}\"",
                name,
                askama_escape::escape(value, askama_escape::Html)
            )?;
        }

        if VOID_TAGS.contains(&self.tag) && self.children.is_empty() {
            return write!(buf, ">");
        }

        write!(buf, ">")?;
        for child in &self.children {
            child.write_html(buf)?;
        }
        write!(buf, "</{}>", self.tag)
    }
}

impl Node {
    /// Render the tree to an HTML string.
    pub fn render(&self) -> String {
        let mut buf = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_html(&mut buf);
        buf
    }

    /// Plain text content, with markup removed.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Raw(html) => {
                let mut in_tag = false;
                for c in html.chars() {
                    match c {
                        '<' => in_tag = true,
                        '>' => in_tag = false,
                        c if !in_tag => out.push(c),
                        _ => {}
                    }
                }
            }
            Node::Element(e) => {
                for child in &e.children {
                    child.collect_text(out);
                }
            }
            Node::Fragment(nodes) => {
                for node in nodes {
                    node.collect_text(out);
                }
            }
        }
    }

    fn write_html(&self, buf: &mut impl Write) -> fmt::Result {
        match self {
            Node::Element(e) => e.write_html(buf),
            Node::Text(t) => write!(buf, "{}", askama_escape::escape(t, askama_escape::Html)),
            Node::Raw(html) => buf.write_str(html),
            Node::Fragment(nodes) => {
                for node in nodes {
                    node.write_html(buf)?;
                }
                Ok(())
            }
        }
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Text(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Text(s)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_html(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_elements() {
        let node: Node = el("div")
            .class("a")
            .child(el("span").text("hi"))
            .into();

        assert_eq!(node.render(), r#"<div class="a"><span>hi</span></div>"#);
    }

    #[test]
    fn combines_classes() {
        let e = el("a").class("justify-between").class_if(true, "active").class_if(false, "x");
        assert_eq!(e.get_attr("class"), Some("justify-between active"));
    }

    #[test]
    fn replaces_attributes() {
        let e = el("a").attr("href", "#/one").attr("href", "#/two");
        assert_eq!(e.attrs.len(), 1);
        assert_eq!(e.get_attr("href"), Some("#/two"));
    }

    #[test]
    fn escapes_text_and_attributes() {
        let node: Node = el("p")
            .attr("title", "\"quoted\"")
            .text("<script>alert(1)</script>")
            .into();
        let html = node.render();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("\"quoted\""));
    }

    #[test]
    fn renders_void_elements_without_closing_tag() {
        let node: Node = el("img").attr("src", "x.png").into();
        assert_eq!(node.render(), r#"<img src="x.png">"#);
    }

    #[test]
    fn keeps_raw_html() {
        let node = markdown("Get the **connection**");
        assert!(node.render().contains("<strong>connection</strong>"));
        assert_eq!(node.text_content().trim(), "Get the connection");
    }

    #[test]
    fn fragments_render_in_order() {
        let node = Node::Fragment(vec![text("a"), text("b")]);
        assert_eq!(node.to_string(), "ab");
    }
}
