//! CommonMark parsing of message bodies into a small block/span model.
//!
//! The event stream from `pulldown_cmark` is folded into [`Block`]s that the
//! terminal layout can print line by line. Nested inline styles are
//! flattened: text inside both strong and emphasis is strong. Raw HTML,
//! images and footnotes are dropped.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Strong(String),
    Emphasis(String),
    Code(String),
    Link { text: String, url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    Bullet,
    Ordered(u64),
    /// A later paragraph of the same item.
    Continuation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, spans: Vec<Span> },
    Paragraph(Vec<Span>),
    ListItem {
        depth: usize,
        marker: ListMarker,
        spans: Vec<Span>,
    },
    Quote(Vec<Span>),
    Code { lang: Option<String>, text: String },
    Rule,
}

/// Containers opened by `Start` events, popped on the matching `End`.
enum Open {
    Paragraph,
    Heading(u8),
    Quote,
    CodeBlock,
    /// Next ordinal for ordered lists.
    List(Option<u64>),
    Item,
    Strong,
    Emphasis,
    Link,
    Other,
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    spans: Vec<Span>,
    open: Vec<Open>,
    strong: usize,
    emphasis: usize,
    link: Option<(String, String)>,
    code: Option<(Option<String>, String)>,
    item_marker: Option<ListMarker>,
}

pub fn parse(source: &str) -> Vec<Block> {
    let mut builder = BlockBuilder::default();
    for event in Parser::new_ext(source, Options::empty()) {
        builder.event(event);
    }
    builder.flush();
    builder.blocks
}

/// Inline spans of `text`, ignoring block structure.
pub fn parse_inline(text: &str) -> Vec<Span> {
    parse(text)
        .into_iter()
        .flat_map(|block| match block {
            Block::Heading { spans, .. }
            | Block::Paragraph(spans)
            | Block::ListItem { spans, .. }
            | Block::Quote(spans) => spans,
            Block::Code { text, .. } => vec![Span::Code(text)],
            Block::Rule => Vec::new(),
        })
        .collect()
}

/// Concatenated visible text of a span run.
pub fn plain_text(spans: &[Span]) -> String {
    spans
        .iter()
        .map(|s| match s {
            Span::Text(t) | Span::Strong(t) | Span::Emphasis(t) | Span::Code(t) => t.as_str(),
            Span::Link { text, .. } => text.as_str(),
        })
        .collect()
}

impl BlockBuilder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => {
                if let Some((_, body)) = self.code.as_mut() {
                    body.push_str(&text);
                } else if let Some((_, label)) = self.link.as_mut() {
                    label.push_str(&text);
                } else {
                    self.push_styled(&text);
                }
            }
            Event::Code(code) => match self.link.as_mut() {
                Some((_, label)) => label.push_str(&code),
                None => self.spans.push(Span::Code(code.to_string())),
            },
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, body)) = self.code.as_mut() {
                    body.push('\n');
                } else if let Some((_, label)) = self.link.as_mut() {
                    label.push(' ');
                } else {
                    self.push_styled(" ");
                }
            }
            Event::Rule => {
                self.flush();
                self.blocks.push(Block::Rule);
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let open = match tag {
            Tag::Paragraph => Open::Paragraph,
            Tag::Heading { level, .. } => {
                self.flush();
                Open::Heading(level as u8)
            }
            Tag::BlockQuote => {
                self.flush();
                Open::Quote
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        Some(info.trim().to_string()).filter(|l| !l.is_empty())
                    }
                    CodeBlockKind::Indented => None,
                };
                self.code = Some((lang, String::new()));
                Open::CodeBlock
            }
            Tag::List(first) => {
                // Tight items carry their text directly; it ends where a nested list begins.
                self.flush();
                Open::List(first)
            }
            Tag::Item => {
                self.flush();
                self.item_marker = Some(match self.open.last_mut() {
                    Some(Open::List(Some(next))) => {
                        let n = *next;
                        *next += 1;
                        ListMarker::Ordered(n)
                    }
                    _ => ListMarker::Bullet,
                });
                Open::Item
            }
            Tag::Strong => {
                self.strong += 1;
                Open::Strong
            }
            Tag::Emphasis => {
                self.emphasis += 1;
                Open::Emphasis
            }
            Tag::Link { dest_url, .. } => {
                self.link = Some((dest_url.to_string(), String::new()));
                Open::Link
            }
            _ => Open::Other,
        };
        self.open.push(open);
    }

    fn end(&mut self) {
        match self.open.pop() {
            Some(Open::Paragraph) | Some(Open::Quote) | Some(Open::List(_)) => self.flush(),
            Some(Open::Item) => {
                self.flush();
                self.item_marker = None;
            }
            Some(Open::Heading(level)) => {
                let spans = std::mem::take(&mut self.spans);
                self.blocks.push(Block::Heading { level, spans });
            }
            Some(Open::CodeBlock) => {
                if let Some((lang, text)) = self.code.take() {
                    self.blocks.push(Block::Code {
                        lang,
                        text: text.trim_end_matches('\n').to_string(),
                    });
                }
            }
            Some(Open::Strong) => self.strong = self.strong.saturating_sub(1),
            Some(Open::Emphasis) => self.emphasis = self.emphasis.saturating_sub(1),
            Some(Open::Link) => {
                if let Some((url, text)) = self.link.take() {
                    self.spans.push(Span::Link { text, url });
                }
            }
            Some(Open::Other) | None => {}
        }
    }

    fn push_styled(&mut self, text: &str) {
        let span = if self.strong > 0 {
            Span::Strong(text.to_string())
        } else if self.emphasis > 0 {
            Span::Emphasis(text.to_string())
        } else {
            Span::Text(text.to_string())
        };
        if let Some(last) = self.spans.last_mut() {
            match (last, &span) {
                (Span::Text(a), Span::Text(b))
                | (Span::Strong(a), Span::Strong(b))
                | (Span::Emphasis(a), Span::Emphasis(b)) => {
                    a.push_str(b);
                    return;
                }
                _ => {}
            }
        }
        self.spans.push(span);
    }

    /// Close the pending span run as a block of the innermost container.
    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.spans);
        let lists = self
            .open
            .iter()
            .filter(|o| matches!(o, Open::List(_)))
            .count();
        let block = if lists > 0 {
            Block::ListItem {
                depth: lists - 1,
                marker: self.item_marker.take().unwrap_or(ListMarker::Continuation),
                spans,
            }
        } else if self.open.iter().any(|o| matches!(o, Open::Quote)) {
            Block::Quote(spans)
        } else {
            Block::Paragraph(spans)
        };
        self.blocks.push(block);
    }
}
