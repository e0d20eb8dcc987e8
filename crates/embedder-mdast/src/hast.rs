//! HTML fragments as element trees.
//!
//! Embed markup arrives as an HTML string; [`parse_fragment`] turns it into
//! an [`Element`] whose parts become a paragraph's [`Data`](crate::Data).

use std::fmt::Write;

use indexmap::IndexMap;
use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::html::escape_html;

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose text content is written without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Error converting markup into an element.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FragmentError {
    /// The fragment contains no nodes at all.
    #[error("HTML fragment is empty")]
    Empty,

    /// The first top-level node is text or a comment rather than an element.
    #[error("HTML fragment does not start with an element (found {found})")]
    NotAnElement {
        /// Kind of node found instead.
        found: &'static str,
    },
}

/// A node inside an HTML fragment.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "camelCase")
)]
pub enum Node {
    Element(Element),
    Text { value: String },
    Comment { value: String },
}

/// An HTML element with attributes in source order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Element {
    pub tag_name: String,
    pub properties: IndexMap<String, String>,
    pub children: Vec<Node>,
}

/// Parse an HTML string and return its root element.
///
/// The fragment is expected to have a single top-level element; any nodes
/// after the first are ignored.
///
/// # Example
///
/// ```
/// use embedder_mdast::hast::{Node, parse_fragment};
///
/// let element = parse_fragment(r#"<a href="/x">go</a>"#).unwrap();
/// assert_eq!(element.tag_name, "a");
/// assert_eq!(element.properties["href"], "/x");
/// assert_eq!(element.children, vec![Node::Text { value: "go".to_owned() }]);
/// ```
pub fn parse_fragment(html: &str) -> Result<Element, FragmentError> {
    let document = Html::parse_fragment(html);

    // parse_fragment wraps the content in an <html> element
    let first = document
        .root_element()
        .children()
        .next()
        .ok_or(FragmentError::Empty)?;

    match first.value() {
        ScraperNode::Element(_) => ElementRef::wrap(first)
            .map(convert_element)
            .ok_or(FragmentError::Empty),
        ScraperNode::Text(_) => Err(FragmentError::NotAnElement { found: "text" }),
        ScraperNode::Comment(_) => Err(FragmentError::NotAnElement { found: "comment" }),
        _ => Err(FragmentError::NotAnElement { found: "other" }),
    }
}

fn convert_element(element: ElementRef<'_>) -> Element {
    let properties = element
        .value()
        .attrs()
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .collect();

    let mut children = Vec::new();
    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => children.push(Node::Text {
                value: (**text).to_owned(),
            }),
            ScraperNode::Comment(comment) => children.push(Node::Comment {
                value: (**comment).to_owned(),
            }),
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    children.push(Node::Element(convert_element(child_element)));
                }
            }
            _ => {}
        }
    }

    Element {
        tag_name: element.value().name().to_owned(),
        properties,
        children,
    }
}

impl Element {
    /// Serialize this element back to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_element(&self.tag_name, &self.properties, &self.children, &mut out);
        out
    }
}

/// Write an element given its parts.
pub(crate) fn write_element(
    tag_name: &str,
    properties: &IndexMap<String, String>,
    children: &[Node],
    out: &mut String,
) {
    out.push('<');
    out.push_str(tag_name);
    for (name, value) in properties {
        write!(out, r#" {name}="{}""#, escape_html(value)).unwrap();
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&tag_name) {
        return;
    }

    let raw_text = RAW_TEXT_ELEMENTS.contains(&tag_name);
    for child in children {
        match child {
            Node::Element(element) => {
                write_element(&element.tag_name, &element.properties, &element.children, out);
            }
            Node::Text { value } if raw_text => out.push_str(value),
            Node::Text { value } => out.push_str(&escape_html(value)),
            Node::Comment { value } => write!(out, "<!--{value}-->").unwrap(),
        }
    }

    write!(out, "</{tag_name}>").unwrap();
}
