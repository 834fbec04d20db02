//! Plain-text layout of rendered messages for a terminal.

use super::markdown::{Block, ListMarker, Span};
use super::{PredictionTable, RenderedMessage};
use crate::locale::Strings;
use crate::types::{format_size, Guideline, MessageKind};

const BOLD: &str = "\x1b[1m";
const ITALIC: &str = "\x1b[3m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerminalStyle {
    /// Emit ANSI bold/italic/dim sequences.
    pub ansi: bool,
}

impl TerminalStyle {
    pub fn plain() -> Self {
        Self { ansi: false }
    }

    pub fn ansi() -> Self {
        Self { ansi: true }
    }

    fn wrap(&self, code: &str, text: &str) -> String {
        if self.ansi {
            format!("{}{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }
}

pub fn format_message(message: &RenderedMessage, style: TerminalStyle) -> String {
    let mut lines = Vec::new();
    let marker = match message.kind {
        MessageKind::User => ">",
        MessageKind::Assistant => "<",
    };
    lines.push(style.wrap(BOLD, &format!("{} {}", marker, message.sender)));
    lines.extend(format_blocks(&message.body, style));

    if let Some(table) = &message.prediction {
        lines.push(String::new());
        lines.extend(format_table(table, style));
    }

    if !message.references.is_empty() {
        lines.push(String::new());
        lines.push(style.wrap(BOLD, message.references_title));
        for reference in &message.references {
            lines.push(format!("  - {}", reference.name));
            if !reference.excerpt.is_empty() {
                lines.push(format!("    {}", style.wrap(DIM, &reference.excerpt)));
            }
        }
    }
    lines.join("\n")
}

pub fn format_blocks(blocks: &[Block], style: TerminalStyle) -> Vec<String> {
    let mut lines = Vec::new();
    let mut previous_was_list = false;
    for (i, block) in blocks.iter().enumerate() {
        let is_list = matches!(block, Block::ListItem { .. });
        // Consecutive list items stay together; everything else gets a gap.
        if i > 0 && !(is_list && previous_was_list) {
            lines.push(String::new());
        }
        previous_was_list = is_list;

        match block {
            Block::Heading { level, spans } => {
                let text = format_spans(spans, style);
                let width = super::markdown::plain_text(spans).chars().count();
                lines.push(style.wrap(BOLD, &text));
                match level {
                    1 => lines.push("=".repeat(width)),
                    2 => lines.push("-".repeat(width)),
                    _ => {}
                }
            }
            Block::Paragraph(spans) => lines.push(format_spans(spans, style)),
            Block::ListItem {
                depth,
                marker,
                spans,
            } => {
                let bullet = match marker {
                    ListMarker::Bullet => "•".to_string(),
                    ListMarker::Ordered(n) => format!("{}.", n),
                    ListMarker::Continuation => "  ".to_string(),
                };
                lines.push(format!(
                    "{}{} {}",
                    "  ".repeat(depth + 1),
                    bullet,
                    format_spans(spans, style)
                ));
            }
            Block::Quote(spans) => lines.push(format!("  | {}", format_spans(spans, style))),
            Block::Code { text, .. } => {
                lines.extend(text.lines().map(|l| format!("    {}", l)));
            }
            Block::Rule => lines.push("-".repeat(40)),
        }
    }
    lines
}

fn format_spans(spans: &[Span], style: TerminalStyle) -> String {
    spans
        .iter()
        .map(|span| match span {
            Span::Text(t) => t.clone(),
            Span::Strong(t) => style.wrap(BOLD, t),
            Span::Emphasis(t) => style.wrap(ITALIC, t),
            Span::Code(t) => format!("`{}`", t),
            Span::Link { text, url } => format!("{} ({})", text, url),
        })
        .collect()
}

pub fn format_table(table: &PredictionTable, style: TerminalStyle) -> Vec<String> {
    let width = table
        .rows
        .iter()
        .map(|r| r.nutrient.chars().count())
        .chain(std::iter::once(table.headers[0].chars().count()))
        .max()
        .unwrap_or(0);
    let pad = |s: &str| {
        let fill = width.saturating_sub(s.chars().count());
        format!("{}{}", s, " ".repeat(fill))
    };

    let mut lines = vec![style.wrap(BOLD, table.title)];
    lines.push(format!("  {}  {}", pad(table.headers[0]), table.headers[1]));
    lines.push(format!("  {}  {}", "-".repeat(width), "-".repeat(table.headers[1].chars().count().max(8))));
    for row in &table.rows {
        lines.push(format!("  {}  {}", pad(&row.nutrient), row.amount));
    }
    lines
}

/// The guideline panel's list: name and human-readable size per line.
pub fn format_guidelines(guidelines: &[Guideline], strings: &Strings) -> Vec<String> {
    if guidelines.is_empty() {
        return vec![format!("  {}", strings.no_guidelines)];
    }
    let width = guidelines
        .iter()
        .map(|g| g.filename.chars().count())
        .max()
        .unwrap_or(0);
    guidelines
        .iter()
        .map(|g| {
            let fill = width - g.filename.chars().count();
            format!("  {}{}  {}", g.filename, " ".repeat(fill), format_size(g.size))
        })
        .collect()
}
