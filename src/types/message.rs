//! Chat message model shared by the conversation log and the renderer

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One entry of the conversation log.
///
/// Messages are never edited after they are appended; the log only grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Markdown body
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<Reference>>,
}

impl Message {
    pub fn user(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_kind(MessageKind::User, id, content)
    }

    pub fn assistant(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_kind(MessageKind::Assistant, id, content)
    }

    pub fn with_kind(kind: MessageKind, id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            content: content.into(),
            prediction: None,
            references: None,
        }
    }

    pub fn with_prediction(mut self, prediction: Prediction) -> Self {
        self.prediction = Some(prediction);
        self
    }

    pub fn with_references(mut self, references: Vec<Reference>) -> Self {
        self.references = Some(references);
        self
    }

    pub fn is_user(&self) -> bool {
        self.kind == MessageKind::User
    }

    /// Reduce to the `{type, content}` pair the backend expects as history.
    pub fn to_history(&self) -> HistoryEntry {
        HistoryEntry {
            kind: self.kind,
            content: self.content.clone(),
        }
    }
}

/// Message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Assistant,
}

/// Prior-turn summary sent alongside a chat request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
}

/// A source excerpt the backend used to answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub content: String,
}

impl Reference {
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: None,
            source: source.into(),
            content: content.into(),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Explicit filename if non-empty, else the last `/` segment of `source`.
    pub fn display_name(&self) -> &str {
        match self.filename.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.source.rsplit('/').next().unwrap_or(""),
        }
    }
}

/// Nutrient name to amount, in the order the backend sent them.
///
/// Deserializes from a JSON object without losing key order, which a
/// `HashMap` would.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Prediction {
    entries: Vec<(String, f64)>,
}

impl Prediction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry. Overwriting keeps the original position.
    pub fn with_entry(mut self, nutrient: impl Into<String>, amount: f64) -> Self {
        self.insert(nutrient.into(), amount);
        self
    }

    fn insert(&mut self, nutrient: String, amount: f64) {
        match self.entries.iter_mut().find(|(k, _)| *k == nutrient) {
            Some(slot) => slot.1 = amount,
            None => self.entries.push((nutrient, amount)),
        }
    }

    pub fn get(&self, nutrient: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == nutrient)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Prediction {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut prediction = Prediction::new();
        for (k, v) in iter {
            prediction.insert(k.into(), v);
        }
        prediction
    }
}

impl Serialize for Prediction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k, v)))
    }
}

impl<'de> Deserialize<'de> for Prediction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PredictionVisitor;

        impl<'de> Visitor<'de> for PredictionVisitor {
            type Value = Prediction;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of nutrient names to numbers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Prediction, A::Error> {
                let mut prediction = Prediction::new();
                while let Some((k, v)) = map.next_entry::<String, f64>()? {
                    prediction.insert(k, v);
                }
                Ok(prediction)
            }
        }

        deserializer.deserialize_map(PredictionVisitor)
    }
}
