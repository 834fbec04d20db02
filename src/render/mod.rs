//! # Message rendering
//!
//! [`render`] turns a [`Message`] into a [`RenderedMessage`]: parsed markdown
//! body, an optional prediction table and the reference excerpts. It is a pure
//! function; [`terminal`] lays the result out as text.
//!
//! Prediction and references are only rendered for assistant messages.
//!
//! ```rust
//! use medvise_client::locale::Locale;
//! use medvise_client::render::render;
//! use medvise_client::types::{Message, Prediction};
//!
//! let msg = Message::assistant("1", "Plan")
//!     .with_prediction(Prediction::new().with_entry("Total Calorie", 1800.0));
//! let out = render(&msg, Locale::English.strings());
//! let table = out.prediction.unwrap();
//! assert_eq!(table.rows[0].amount, "1800 kcal");
//! ```

pub mod markdown;
pub mod terminal;

use crate::locale::Strings;
use crate::types::{Message, MessageKind, Prediction, Reference};
pub use markdown::{Block, Span};

/// Reference excerpts longer than this many characters are cut and suffixed with `...`.
pub const EXCERPT_LIMIT: usize = 150;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    pub id: String,
    pub kind: MessageKind,
    pub sender: &'static str,
    pub body: Vec<Block>,
    pub prediction: Option<PredictionTable>,
    /// Empty when there is nothing to show.
    pub references: Vec<RenderedReference>,
    pub references_title: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionTable {
    pub title: &'static str,
    pub headers: [&'static str; 2],
    pub rows: Vec<PredictionRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRow {
    pub nutrient: String,
    /// Amount with its unit, e.g. `"70 g"`.
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReference {
    pub name: String,
    pub excerpt: String,
}

pub fn render(message: &Message, strings: &Strings) -> RenderedMessage {
    let is_assistant = message.kind == MessageKind::Assistant;
    let prediction = message
        .prediction
        .as_ref()
        .filter(|_| is_assistant)
        .map(|p| prediction_table(p, strings));
    let references = match &message.references {
        Some(refs) if is_assistant => refs.iter().map(render_reference).collect(),
        _ => Vec::new(),
    };

    RenderedMessage {
        id: message.id.clone(),
        kind: message.kind,
        sender: if is_assistant {
            strings.assistant_label
        } else {
            strings.user_label
        },
        body: markdown::parse(&message.content),
        prediction,
        references,
        references_title: strings.references_title,
    }
}

pub fn prediction_table(prediction: &Prediction, strings: &Strings) -> PredictionTable {
    PredictionTable {
        title: strings.prediction_title,
        headers: [strings.nutrient_header, strings.amount_header],
        rows: prediction
            .iter()
            .map(|(nutrient, amount)| PredictionRow {
                nutrient: nutrient.to_string(),
                amount: format!("{} {}", amount, unit_for(nutrient)),
            })
            .collect(),
    }
}

/// `"kcal"` for calorie entries, grams for everything else.
pub fn unit_for(nutrient: &str) -> &'static str {
    if nutrient.contains("Calorie") {
        "kcal"
    } else {
        "g"
    }
}

pub fn render_reference(reference: &Reference) -> RenderedReference {
    RenderedReference {
        name: reference.display_name().to_string(),
        excerpt: excerpt(&reference.content, EXCERPT_LIMIT),
    }
}

/// First `limit` characters plus `...`, or the whole text if it fits.
pub fn excerpt(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
