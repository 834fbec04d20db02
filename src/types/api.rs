//! Request and response bodies of the backend REST API

use super::guideline::Guideline;
use super::message::{HistoryEntry, Prediction, Reference};
use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub history: &'a [HistoryEntry],
}

/// Body returned by `POST /chat`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<Reference>>,
    /// Set by the backend when part of its pipeline degraded but it still answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            ..Default::default()
        }
    }
}

/// Body returned by `GET /guidelines`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GuidelineList {
    #[serde(default)]
    pub guidelines: Vec<Guideline>,
}

/// Body returned by `POST /guidelines`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub message: Option<String>,
    /// Name the server stored the file under (it may sanitize the original).
    #[serde(default)]
    pub filename: Option<String>,
}

/// Body returned by `DELETE /guidelines/{filename}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeleteResult {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body returned by `GET /health`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}
