use crate::client::backend::Backend;
use crate::transport::HttpTransport;
use crate::types::{
    ChatRequest, ChatResponse, DeleteResult, Guideline, GuidelineList, HealthStatus, HistoryEntry,
    UploadFile, UploadResult,
};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

/// HTTP implementation of [`Backend`].
pub struct ApiClient {
    transport: HttpTransport,
}

impl ApiClient {
    pub fn builder() -> crate::client::ApiClientBuilder {
        crate::client::ApiClientBuilder::new()
    }

    pub(crate) fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub fn api_base(&self) -> &url::Url {
        self.transport.api_base()
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn send_message(&self, message: &str, history: &[HistoryEntry]) -> Result<ChatResponse> {
        debug!(history_len = history.len(), "sending chat message");
        let request = ChatRequest { message, history };
        let response: ChatResponse = self.transport.post_json(&["chat"], &request, "chat").await?;
        if let Some(detail) = response.error.as_deref() {
            warn!(detail, "backend answered with a degraded result");
        }
        Ok(response)
    }

    async fn list_guidelines(&self) -> Result<Vec<Guideline>> {
        let list: GuidelineList = self
            .transport
            .get_json(&["guidelines"], "guidelines.list")
            .await?;
        Ok(list.guidelines)
    }

    async fn upload_guideline(&self, file: &UploadFile) -> Result<UploadResult> {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(mime_for(file))
            .map_err(|e| {
                Error::request_setup_with_context(
                    format!("Invalid mime: {}", e),
                    ErrorContext::new().with_source("guidelines.upload"),
                )
            })?;
        let form = reqwest::multipart::Form::new().part("file", part);
        debug!(filename = %file.name, bytes = file.bytes.len(), "uploading guideline");
        self.transport
            .post_multipart(&["guidelines"], form, "guidelines.upload")
            .await
    }

    async fn delete_guideline(&self, filename: &str) -> Result<DeleteResult> {
        self.transport
            .delete_json(&["guidelines", filename], "guidelines.delete")
            .await
    }

    async fn fetch_guideline_content(&self, filename: &str) -> Result<String> {
        self.transport
            .get_text(&["guidelines", filename], "guidelines.fetch")
            .await
    }

    async fn check_health(&self) -> Result<HealthStatus> {
        self.transport.get_json(&["health"], "health").await
    }
}

fn mime_for(file: &UploadFile) -> &'static str {
    match file.extension().as_deref() {
        Some(".pdf") => "application/pdf",
        Some(".md") | Some(".markdown") => "text/markdown",
        Some(".txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
