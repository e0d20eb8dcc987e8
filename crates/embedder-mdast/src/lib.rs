//! Markdown syntax tree with embed annotations.
//!
//! This crate provides the document tree the embedder operates on:
//! - [`Node`]: mdast-shaped tree (paragraphs, links, text, ...)
//! - [`parse_markdown`]: builds a tree from a pulldown-cmark event stream
//! - [`hast`]: HTML fragments parsed into elements via `scraper`
//! - [`to_html`]: serializes a tree, rendering annotated paragraphs as their
//!   embedded element instead of `<p>`
//!
//! # Example
//!
//! ```
//! use embedder_mdast::{Data, Node, hast, parse_markdown, to_html};
//!
//! let mut tree = parse_markdown("https://example.com");
//! let Node::Root(root) = &mut tree else { unreachable!() };
//! let Node::Paragraph(paragraph) = &mut root.children[0] else { unreachable!() };
//!
//! let element = hast::parse_fragment("<div>embedded</div>").unwrap();
//! paragraph.data = Some(Data::from(element));
//!
//! assert_eq!(to_html(&tree), "<div>embedded</div>");
//! ```

pub mod hast;
mod html;
mod node;
mod parse;

pub use html::{escape_html, to_html};
pub use node::{
    Code, Data, Heading, Image, Link, List, Literal, Node, Paragraph, Parent,
};
pub use parse::{from_events, parse_markdown};
