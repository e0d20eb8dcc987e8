//! Candidate discovery.
//!
//! A paragraph is an embed candidate when its entire content is a URL: either
//! a single text node or a single untitled link whose text is its own URL.

use embedder_mdast::{Node, Paragraph};
use url::Url;

use crate::url::normalize_url;

/// A paragraph eligible for embedding, with its normalized URL.
///
/// Each candidate holds the only mutable borrow of its paragraph, so
/// candidates can be processed independently and in any order.
#[derive(Debug)]
pub struct Candidate<'a> {
    pub parent: &'a mut Paragraph,
    pub url: Url,
}

/// Collect embed candidates in document order.
///
/// Paragraphs nested in block quotes and lists are found too. Shapes that do
/// not qualify and URLs that fail to normalize are skipped. A single word
/// normalizes to a host name (`Intro` becomes `https://intro/`), so it is a
/// candidate; transformers decide whether to take it.
///
/// # Example
///
/// ```
/// use embedder::scan::scan;
/// use embedder_mdast::parse_markdown;
///
/// let mut tree = parse_markdown("Some intro\n\nhttps://example.com\n\n> <https://a.test>");
/// let urls: Vec<String> = scan(&mut tree).into_iter().map(|c| c.url.into()).collect();
///
/// assert_eq!(urls, ["https://example.com/", "https://a.test/"]);
/// ```
pub fn scan(tree: &mut Node) -> Vec<Candidate<'_>> {
    let mut candidates = Vec::new();
    visit(tree, &mut candidates);
    tracing::debug!("Found {} embed candidate(s)", candidates.len());
    candidates
}

fn visit<'a>(node: &'a mut Node, candidates: &mut Vec<Candidate<'a>>) {
    match node {
        Node::Paragraph(paragraph) => {
            if let Some(url) = candidate_url(paragraph) {
                candidates.push(Candidate {
                    parent: paragraph,
                    url,
                });
            }
        }
        other => {
            if let Some(children) = other.children_mut() {
                for child in children {
                    visit(child, candidates);
                }
            }
        }
    }
}

/// The normalized URL of a paragraph that consists of nothing but a URL.
pub fn candidate_url(paragraph: &Paragraph) -> Option<Url> {
    let [only] = paragraph.children.as_slice() else {
        return None;
    };

    let raw = match only {
        Node::Text(text) => text.value.as_str(),
        Node::Link(link) if link.title.is_none() => match link.children.as_slice() {
            [Node::Text(text)] if text.value == link.url => link.url.as_str(),
            _ => return None,
        },
        _ => return None,
    };

    normalize_url(raw)
}
