//! In-memory backend for testing and offline demos.

use crate::client::backend::Backend;
use crate::types::{
    ChatResponse, DeleteResult, Guideline, HealthStatus, HistoryEntry, UploadFile, UploadResult,
};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// One recorded call against an [`InMemoryBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    SendMessage {
        message: String,
        history: Vec<HistoryEntry>,
    },
    ListGuidelines,
    Upload {
        filename: String,
    },
    Delete {
        filename: String,
    },
    FetchContent {
        filename: String,
    },
    Health,
}

impl BackendCall {
    fn same_kind(&self, other: &BackendCall) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Backend that keeps guidelines in memory and answers chat from a script.
///
/// Without scripted replies, chat echoes the message back. Failures can be
/// queued per operation and list responses can be delayed to reproduce
/// out-of-order arrival.
#[derive(Default)]
pub struct InMemoryBackend {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    guidelines: Vec<Guideline>,
    contents: HashMap<String, String>,
    chat_replies: VecDeque<Result<ChatResponse>>,
    failures: VecDeque<(BackendCall, Error)>,
    list_delays: VecDeque<Duration>,
    upload_delays: VecDeque<Duration>,
    calls: Vec<BackendCall>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_guideline(self, filename: impl Into<String>, content: impl Into<String>) -> Self {
        {
            let mut inner = self.lock();
            inner.store(filename.into(), content.into().into_bytes());
        }
        self
    }

    /// Queue the outcome of the next chat request.
    pub fn push_chat_reply(&self, reply: Result<ChatResponse>) {
        self.lock().chat_replies.push_back(reply);
    }

    /// Fail the next call of the same kind as `call` (its fields are ignored).
    pub fn fail_next(&self, call: BackendCall, error: Error) {
        self.lock().failures.push_back((call, error));
    }

    /// Delay the next list response. The listing itself is taken when the call starts.
    pub fn delay_next_list(&self, delay: Duration) {
        self.lock().list_delays.push_back(delay);
    }

    /// Delay the next upload before it is stored.
    pub fn delay_next_upload(&self, delay: Duration) {
        self.lock().upload_delays.push_back(delay);
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    pub fn count(&self, call: &BackendCall) -> usize {
        self.lock().calls.iter().filter(|c| c.same_kind(call)).count()
    }

    pub fn stored(&self) -> Vec<Guideline> {
        self.lock().guidelines.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the call and hand back a queued failure for it, if any.
    fn record(&self, call: BackendCall) -> Result<()> {
        let mut inner = self.lock();
        let failure = inner.failures.iter().position(|(c, _)| c.same_kind(&call));
        inner.calls.push(call);
        match failure.and_then(|idx| inner.failures.remove(idx)) {
            Some((_, err)) => Err(err),
            None => Ok(()),
        }
    }
}

impl Inner {
    fn store(&mut self, filename: String, bytes: Vec<u8>) {
        let size = bytes.len() as u64;
        match self.guidelines.iter_mut().find(|g| g.filename == filename) {
            Some(existing) => existing.size = size,
            None => self.guidelines.push(Guideline::new(filename.clone(), size)),
        }
        self.contents
            .insert(filename, String::from_utf8_lossy(&bytes).into_owned());
    }
}

fn not_found() -> Error {
    Error::Server {
        status: 404,
        message: "guideline not found".to_string(),
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn send_message(&self, message: &str, history: &[HistoryEntry]) -> Result<ChatResponse> {
        self.record(BackendCall::SendMessage {
            message: message.to_string(),
            history: history.to_vec(),
        })?;
        let scripted = self.lock().chat_replies.pop_front();
        scripted.unwrap_or_else(|| Ok(ChatResponse::text(format!("echo: {}", message))))
    }

    async fn list_guidelines(&self) -> Result<Vec<Guideline>> {
        self.record(BackendCall::ListGuidelines)?;
        let (snapshot, delay) = {
            let mut inner = self.lock();
            (inner.guidelines.clone(), inner.list_delays.pop_front())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(snapshot)
    }

    async fn upload_guideline(&self, file: &UploadFile) -> Result<UploadResult> {
        self.record(BackendCall::Upload {
            filename: file.name.clone(),
        })?;
        let delay = self.lock().upload_delays.pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.lock().store(file.name.clone(), file.bytes.clone());
        Ok(UploadResult {
            message: Some("uploaded".to_string()),
            filename: Some(file.name.clone()),
        })
    }

    async fn delete_guideline(&self, filename: &str) -> Result<DeleteResult> {
        self.record(BackendCall::Delete {
            filename: filename.to_string(),
        })?;
        let mut inner = self.lock();
        let before = inner.guidelines.len();
        inner.guidelines.retain(|g| g.filename != filename);
        inner.contents.remove(filename);
        if inner.guidelines.len() == before {
            return Err(not_found());
        }
        Ok(DeleteResult {
            message: Some(format!("deleted {}", filename)),
        })
    }

    async fn fetch_guideline_content(&self, filename: &str) -> Result<String> {
        self.record(BackendCall::FetchContent {
            filename: filename.to_string(),
        })?;
        self.lock().contents.get(filename).cloned().ok_or_else(not_found)
    }

    async fn check_health(&self) -> Result<HealthStatus> {
        self.record(BackendCall::Health)?;
        Ok(HealthStatus {
            status: "healthy".to_string(),
            extra: Default::default(),
        })
    }
}
