use crate::types::{
    ChatResponse, DeleteResult, Guideline, HealthStatus, HistoryEntry, UploadFile, UploadResult,
};
use crate::Result;
use async_trait::async_trait;

/// Operations the backend exposes under `/api`.
///
/// Implementations must not retry; a retry is always a new user action.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /chat`. `history` is the log before this message, oldest first.
    async fn send_message(&self, message: &str, history: &[HistoryEntry]) -> Result<ChatResponse>;

    /// `GET /guidelines`
    async fn list_guidelines(&self) -> Result<Vec<Guideline>>;

    /// `POST /guidelines` as multipart with the file in field `file`.
    async fn upload_guideline(&self, file: &UploadFile) -> Result<UploadResult>;

    /// `DELETE /guidelines/{filename}`
    async fn delete_guideline(&self, filename: &str) -> Result<DeleteResult>;

    /// `GET /guidelines/{filename}`, returned as the raw body.
    async fn fetch_guideline_content(&self, filename: &str) -> Result<String>;

    /// `GET /health`
    async fn check_health(&self) -> Result<HealthStatus>;
}
