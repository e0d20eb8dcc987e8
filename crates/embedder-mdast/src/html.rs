//! HTML serialization of the markdown tree.
//!
//! Produces plain semantic HTML. Paragraphs carrying an embed annotation are
//! replaced by the annotated element.

use std::fmt::Write;

use crate::hast::write_element;
use crate::node::Node;

/// Serialize a tree to HTML.
///
/// Block-level siblings are separated by a newline.
///
/// # Example
///
/// ```
/// use embedder_mdast::{parse_markdown, to_html};
///
/// let html = to_html(&parse_markdown("# Title\n\nSome *text*"));
/// assert_eq!(html, "<h1>Title</h1>\n<p>Some <em>text</em></p>");
/// ```
pub fn to_html(node: &Node) -> String {
    let mut out = String::with_capacity(1024);
    write_node(node, &mut out);
    out
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Root(root) => write_blocks(&root.children, out),
        Node::Paragraph(paragraph) => {
            if let Some(data) = &paragraph.data {
                write_element(&data.h_name, &data.h_properties, &data.h_children, out);
            } else {
                out.push_str("<p>");
                write_inlines(&paragraph.children, out);
                out.push_str("</p>");
            }
        }
        Node::Heading(heading) => {
            write!(out, "<h{}>", heading.depth).unwrap();
            write_inlines(&heading.children, out);
            write!(out, "</h{}>", heading.depth).unwrap();
        }
        Node::Blockquote(quote) => {
            out.push_str("<blockquote>\n");
            write_blocks(&quote.children, out);
            out.push_str("\n</blockquote>");
        }
        Node::List(list) => {
            let tag = if list.ordered { "ol" } else { "ul" };
            match list.start {
                Some(start) if list.ordered && start != 1 => {
                    write!(out, r#"<{tag} start="{start}">"#).unwrap();
                }
                _ => write!(out, "<{tag}>").unwrap(),
            }
            out.push('\n');
            write_blocks(&list.children, out);
            write!(out, "\n</{tag}>").unwrap();
        }
        Node::ListItem(item) => {
            out.push_str("<li>");
            write_blocks(&item.children, out);
            out.push_str("</li>");
        }
        Node::Code(code) => {
            if let Some(lang) = &code.lang {
                write!(
                    out,
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    escape_html(lang),
                    escape_html(&code.value)
                )
                .unwrap();
            } else {
                write!(out, "<pre><code>{}</code></pre>", escape_html(&code.value)).unwrap();
            }
        }
        Node::Html(html) => out.push_str(&html.value),
        Node::ThematicBreak => out.push_str("<hr>"),
        Node::Text(text) => out.push_str(&escape_html(&text.value)),
        Node::Emphasis(parent) => wrap_inlines("em", &parent.children, out),
        Node::Strong(parent) => wrap_inlines("strong", &parent.children, out),
        Node::Delete(parent) => wrap_inlines("del", &parent.children, out),
        Node::InlineCode(code) => write!(out, "<code>{}</code>", escape_html(&code.value)).unwrap(),
        Node::Link(link) => {
            write!(out, r#"<a href="{}""#, escape_html(&link.url)).unwrap();
            if let Some(title) = &link.title {
                write!(out, r#" title="{}""#, escape_html(title)).unwrap();
            }
            out.push('>');
            write_inlines(&link.children, out);
            out.push_str("</a>");
        }
        Node::Image(image) => {
            write!(
                out,
                r#"<img src="{}" alt="{}""#,
                escape_html(&image.url),
                escape_html(&image.alt)
            )
            .unwrap();
            if let Some(title) = &image.title {
                write!(out, r#" title="{}""#, escape_html(title)).unwrap();
            }
            out.push('>');
        }
        Node::Break => out.push_str("<br>\n"),
    }
}

fn write_blocks(children: &[Node], out: &mut String) {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_node(child, out);
    }
}

fn write_inlines(children: &[Node], out: &mut String) {
    for child in children {
        write_node(child, out);
    }
}

fn wrap_inlines(tag: &str, children: &[Node], out: &mut String) {
    write!(out, "<{tag}>").unwrap();
    write_inlines(children, out);
    write!(out, "</{tag}>").unwrap();
}
