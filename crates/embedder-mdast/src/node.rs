//! Markdown syntax tree.
//!
//! Node shapes follow mdast so trees can be exchanged with other tooling
//! (see the `serde` feature). Only paragraphs carry [`Data`], the slot the
//! embedder writes into.

use indexmap::IndexMap;

use crate::hast;

/// A node in the markdown tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "camelCase")
)]
pub enum Node {
    /// Document root.
    Root(Parent),
    /// Paragraph of inline content.
    Paragraph(Paragraph),
    /// ATX or setext heading.
    Heading(Heading),
    /// Block quote.
    Blockquote(Parent),
    /// Ordered or unordered list of `ListItem`s.
    List(List),
    /// List item containing block content.
    ListItem(Parent),
    /// Fenced or indented code block.
    Code(Code),
    /// Raw HTML (block or inline).
    Html(Literal),
    /// Horizontal rule.
    ThematicBreak,
    /// Plain text.
    Text(Literal),
    /// Emphasis (italic).
    Emphasis(Parent),
    /// Strong emphasis (bold).
    Strong(Parent),
    /// Strikethrough.
    Delete(Parent),
    /// Inline code span.
    InlineCode(Literal),
    /// Hyperlink.
    Link(Link),
    /// Image.
    Image(Image),
    /// Hard line break.
    Break,
}

/// A node whose only content is its children.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parent {
    pub children: Vec<Node>,
}

/// A node whose only content is a string value.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Literal {
    pub value: String,
}

/// Paragraph with an optional embed annotation.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Paragraph {
    pub children: Vec<Node>,
    /// Embed annotation; when set, serializers render this element in place
    /// of the paragraph.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub data: Option<Data>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Heading {
    /// Level 1-6.
    pub depth: u8,
    pub children: Vec<Node>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct List {
    pub ordered: bool,
    /// Start number of an ordered list.
    pub start: Option<u64>,
    pub children: Vec<Node>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Code {
    pub lang: Option<String>,
    pub value: String,
}

/// Hyperlink.
///
/// `title` is `None` when the source had no title at all; an explicitly empty
/// title is `Some(String::new())`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    pub url: String,
    pub title: Option<String>,
    pub children: Vec<Node>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Image {
    pub url: String,
    pub title: Option<String>,
    pub alt: String,
}

/// Embed annotation attached to a paragraph.
///
/// Mirrors the root element of the embedded HTML fragment: its tag name,
/// attributes and child nodes.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Data {
    pub h_name: String,
    pub h_properties: IndexMap<String, String>,
    pub h_children: Vec<hast::Node>,
}

impl From<hast::Element> for Data {
    fn from(element: hast::Element) -> Self {
        Self {
            h_name: element.tag_name,
            h_properties: element.properties,
            h_children: element.children,
        }
    }
}

impl Node {
    /// Create a root node.
    pub fn root(children: Vec<Node>) -> Self {
        Node::Root(Parent { children })
    }

    /// Create a paragraph without annotation.
    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph(Paragraph {
            children,
            data: None,
        })
    }

    /// Create a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(Literal {
            value: value.into(),
        })
    }

    /// Create a link node.
    pub fn link(url: impl Into<String>, title: Option<String>, children: Vec<Node>) -> Self {
        Node::Link(Link {
            url: url.into(),
            title,
            children,
        })
    }

    /// Child nodes, for node types that have them.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Root(parent)
            | Node::Blockquote(parent)
            | Node::ListItem(parent)
            | Node::Emphasis(parent)
            | Node::Strong(parent)
            | Node::Delete(parent) => Some(&parent.children),
            Node::Paragraph(paragraph) => Some(&paragraph.children),
            Node::Heading(heading) => Some(&heading.children),
            Node::List(list) => Some(&list.children),
            Node::Link(link) => Some(&link.children),
            Node::Code(_)
            | Node::Html(_)
            | Node::ThematicBreak
            | Node::Text(_)
            | Node::InlineCode(_)
            | Node::Image(_)
            | Node::Break => None,
        }
    }

    /// Mutable child nodes, for node types that have them.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Root(parent)
            | Node::Blockquote(parent)
            | Node::ListItem(parent)
            | Node::Emphasis(parent)
            | Node::Strong(parent)
            | Node::Delete(parent) => Some(&mut parent.children),
            Node::Paragraph(paragraph) => Some(&mut paragraph.children),
            Node::Heading(heading) => Some(&mut heading.children),
            Node::List(list) => Some(&mut list.children),
            Node::Link(link) => Some(&mut link.children),
            Node::Code(_)
            | Node::Html(_)
            | Node::ThematicBreak
            | Node::Text(_)
            | Node::InlineCode(_)
            | Node::Image(_)
            | Node::Break => None,
        }
    }

    /// Whether this node is phrasing (inline) content.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            Node::Text(_)
                | Node::Emphasis(_)
                | Node::Strong(_)
                | Node::Delete(_)
                | Node::InlineCode(_)
                | Node::Link(_)
                | Node::Image(_)
                | Node::Break
                | Node::Html(_)
        )
    }

    /// Concatenated string value of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(literal) | Node::InlineCode(literal) | Node::Html(literal) => {
                out.push_str(&literal.value);
            }
            Node::Code(code) => out.push_str(&code.value),
            Node::Image(image) => out.push_str(&image.alt),
            _ => {
                for child in self.children().unwrap_or_default() {
                    child.collect_text(out);
                }
            }
        }
    }
}
