//! Markdown to tree conversion.
//!
//! Folds a pulldown-cmark event stream into a [`Node`] tree using a stack of
//! open containers. The result follows mdast conventions where pulldown-cmark
//! differs:
//! - adjacent text events are merged into one text node
//! - inline content directly inside a tight list item is wrapped in a paragraph
//! - email autolinks get a `mailto:` URL
//! - code block values drop their trailing newline

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag};

use crate::node::{Code, Heading, Image, Link, List, Literal, Node, Paragraph, Parent};

/// Parse markdown text into a tree rooted at [`Node::Root`].
///
/// Strikethrough and GFM blockquote tags are enabled.
///
/// # Example
///
/// ```
/// use embedder_mdast::{Node, parse_markdown};
///
/// let tree = parse_markdown("<https://example.com>");
/// let Node::Root(root) = &tree else { unreachable!() };
/// let Node::Paragraph(paragraph) = &root.children[0] else { unreachable!() };
/// assert!(matches!(&paragraph.children[0], Node::Link(link) if link.url == "https://example.com"));
/// ```
pub fn parse_markdown(markdown: &str) -> Node {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_GFM;
    from_events(Parser::new_ext(markdown, options))
}

/// Build a tree from an arbitrary pulldown-cmark event stream.
pub fn from_events<'a, I>(events: I) -> Node
where
    I: Iterator<Item = Event<'a>>,
{
    let mut builder = TreeBuilder::new();
    for event in events {
        builder.process_event(event);
    }
    builder.finish()
}

/// Container kinds that can be open while folding events.
enum Frame {
    Root,
    Paragraph,
    Heading(u8),
    Blockquote,
    List(Option<u64>),
    ListItem,
    Emphasis,
    Strong,
    Delete,
    Link { url: String, title: Option<String> },
    Image { url: String, title: Option<String> },
    CodeBlock { lang: Option<String> },
    HtmlBlock,
    /// Unsupported container; its children are spliced into the parent.
    Transparent,
}

struct Open {
    frame: Frame,
    children: Vec<Node>,
}

struct TreeBuilder {
    stack: Vec<Open>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Open {
                frame: Frame::Root,
                children: Vec::new(),
            }],
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(_) => self.end_tag(),
            Event::Text(text) => self.push_text(&text),
            Event::Code(code) => self.push(Node::InlineCode(Literal {
                value: code.into_string(),
            })),
            Event::Html(html) | Event::InlineHtml(html) => self.push_html(&html),
            Event::SoftBreak => self.push_text("\n"),
            Event::HardBreak => self.push(Node::Break),
            Event::Rule => self.push(Node::ThematicBreak),
            Event::TaskListMarker(_)
            | Event::FootnoteReference(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_) => {
                // Not supported
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => Frame::Paragraph,
            Tag::Heading { level, .. } => Frame::Heading(heading_level_to_num(level)),
            Tag::BlockQuote(_) => Frame::Blockquote,
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(ToOwned::to_owned),
                    CodeBlockKind::Indented => None,
                };
                Frame::CodeBlock { lang }
            }
            Tag::HtmlBlock => Frame::HtmlBlock,
            Tag::List(start) => Frame::List(start),
            Tag::Item => Frame::ListItem,
            Tag::Emphasis => Frame::Emphasis,
            Tag::Strong => Frame::Strong,
            Tag::Strikethrough => Frame::Delete,
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let url = if matches!(link_type, LinkType::Email) {
                    format!("mailto:{dest_url}")
                } else {
                    dest_url.into_string()
                };
                Frame::Link {
                    url,
                    title: non_empty(title.into_string()),
                }
            }
            Tag::Image {
                dest_url, title, ..
            } => Frame::Image {
                url: dest_url.into_string(),
                title: non_empty(title.into_string()),
            },
            Tag::FootnoteDefinition(_)
            | Tag::MetadataBlock(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::Table(_)
            | Tag::TableHead
            | Tag::TableRow
            | Tag::TableCell
            | Tag::Superscript
            | Tag::Subscript => Frame::Transparent,
        };

        self.stack.push(Open {
            frame,
            children: Vec::new(),
        });
    }

    fn end_tag(&mut self) {
        // The root frame is only closed by `finish`
        if self.stack.len() < 2 {
            return;
        }
        let Some(Open { frame, children }) = self.stack.pop() else {
            return;
        };

        let node = match frame {
            Frame::Root => Node::root(children),
            Frame::Paragraph => Node::Paragraph(Paragraph {
                children,
                data: None,
            }),
            Frame::Heading(depth) => Node::Heading(Heading { depth, children }),
            Frame::Blockquote => Node::Blockquote(Parent { children }),
            Frame::List(start) => Node::List(List {
                ordered: start.is_some(),
                start,
                children,
            }),
            Frame::ListItem => Node::ListItem(Parent {
                children: wrap_loose_inlines(children),
            }),
            Frame::Emphasis => Node::Emphasis(Parent { children }),
            Frame::Strong => Node::Strong(Parent { children }),
            Frame::Delete => Node::Delete(Parent { children }),
            Frame::Link { url, title } => Node::Link(Link {
                url,
                title,
                children,
            }),
            Frame::Image { url, title } => Node::Image(Image {
                url,
                title,
                alt: children.iter().map(Node::text_content).collect(),
            }),
            Frame::CodeBlock { lang } => {
                let mut value: String = children.iter().map(Node::text_content).collect();
                if value.ends_with('\n') {
                    value.pop();
                }
                Node::Code(Code { lang, value })
            }
            Frame::HtmlBlock => {
                let value: String = children.iter().map(Node::text_content).collect();
                Node::Html(Literal {
                    value: value.trim_end_matches('\n').to_owned(),
                })
            }
            Frame::Transparent => {
                for child in children {
                    self.push(child);
                }
                return;
            }
        };

        self.push(node);
    }

    fn current(&mut self) -> &mut Open {
        // The root frame is never popped before `finish`
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn push(&mut self, node: Node) {
        if let Node::Text(text) = &node {
            self.push_text(&text.value);
        } else {
            self.current().children.push(node);
        }
    }

    fn push_text(&mut self, text: &str) {
        let children = &mut self.current().children;
        if let Some(Node::Text(last)) = children.last_mut() {
            last.value.push_str(text);
        } else {
            children.push(Node::text(text));
        }
    }

    fn push_html(&mut self, html: &str) {
        let open = self.current();
        if matches!(open.frame, Frame::HtmlBlock)
            && let Some(Node::Html(last)) = open.children.last_mut()
        {
            last.value.push_str(html);
            return;
        }
        open.children.push(Node::Html(Literal {
            value: html.to_owned(),
        }));
    }

    fn finish(mut self) -> Node {
        while self.stack.len() > 1 {
            self.end_tag();
        }
        let children = self
            .stack
            .pop()
            .map(|open| open.children)
            .unwrap_or_default();
        Node::root(children)
    }
}

/// Wrap runs of inline nodes in paragraphs, leaving block nodes as they are.
fn wrap_loose_inlines(children: Vec<Node>) -> Vec<Node> {
    if !children.iter().any(Node::is_inline) {
        return children;
    }

    let mut blocks = Vec::with_capacity(children.len());
    let mut run = Vec::new();
    for child in children {
        if child.is_inline() {
            run.push(child);
        } else {
            if !run.is_empty() {
                blocks.push(Node::paragraph(std::mem::take(&mut run)));
            }
            blocks.push(child);
        }
    }
    if !run.is_empty() {
        blocks.push(Node::paragraph(run));
    }
    blocks
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
