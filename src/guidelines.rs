//! Guideline panel: the cached list of uploaded documents, the selected file,
//! and the inline notices shown after each operation.
//!
//! The server owns the list. Every mutation is followed by a full refresh;
//! nothing is patched locally. Methods take `&self` so uploads, deletes and
//! refreshes may overlap. The cache lock is never held across a request.

use crate::client::Backend;
use crate::locale::{Locale, Strings};
use crate::types::{DeleteResult, Guideline, UploadFile, UploadResult};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error};

/// Extensions accepted for upload, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 4] = [".txt", ".md", ".markdown", ".pdf"];

pub fn is_allowed_file(name: &str) -> bool {
    UploadFile::new(name, Vec::new())
        .extension()
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Gate in front of destructive actions.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// A pre-answered confirmation.
#[async_trait]
impl Confirm for bool {
    async fn confirm(&self, _prompt: &str) -> bool {
        *self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Success,
}

/// A status line shown under the upload controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Default)]
struct PanelState {
    guidelines: Vec<Guideline>,
    /// Ticket of the refresh whose result is currently shown.
    applied_ticket: u64,
    selected: Option<UploadFile>,
    /// Uploads started and not yet finished.
    uploads_in_flight: usize,
    error: Option<String>,
    success: Option<String>,
}

pub struct GuidelineManager {
    backend: Arc<dyn Backend>,
    strings: &'static Strings,
    state: Mutex<PanelState>,
    issued_tickets: AtomicU64,
}

impl GuidelineManager {
    pub fn new(backend: Arc<dyn Backend>, locale: Locale) -> Self {
        Self {
            backend,
            strings: locale.strings(),
            state: Mutex::new(PanelState::default()),
            issued_tickets: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Cached list as of the newest applied refresh.
    pub fn guidelines(&self) -> Vec<Guideline> {
        self.lock().guidelines.clone()
    }

    /// Current notices, error first.
    pub fn notices(&self) -> Vec<Notice> {
        let state = self.lock();
        let mut out = Vec::new();
        if let Some(text) = &state.error {
            out.push(Notice {
                kind: NoticeKind::Error,
                text: text.clone(),
            });
        }
        if let Some(text) = &state.success {
            out.push(Notice {
                kind: NoticeKind::Success,
                text: text.clone(),
            });
        }
        out
    }

    pub fn error_notice(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn success_notice(&self) -> Option<String> {
        self.lock().success.clone()
    }

    pub fn clear_notices(&self) {
        let mut state = self.lock();
        state.error = None;
        state.success = None;
    }

    /// Put a file in the input buffer. Clears a pending error notice.
    pub fn select_file(&self, file: UploadFile) {
        let mut state = self.lock();
        state.selected = Some(file);
        state.error = None;
    }

    pub fn selected_name(&self) -> Option<String> {
        self.lock().selected.as_ref().map(|f| f.name.clone())
    }

    pub fn is_uploading(&self) -> bool {
        self.lock().uploads_in_flight > 0
    }

    /// Upload the selected file.
    ///
    /// The extension is checked before any request. On success the input
    /// buffer is cleared and the list refreshed.
    pub async fn upload(&self) -> Result<UploadResult> {
        let file = {
            let mut state = self.lock();
            let Some(file) = state.selected.clone() else {
                state.error = Some(self.strings.select_file.to_string());
                return Err(Error::NoFileSelected);
            };
            if !is_allowed_file(&file.name) {
                state.error = Some(self.strings.unsupported_file_type.to_string());
                return Err(Error::UnsupportedFileType {
                    filename: file.name,
                    allowed: ALLOWED_EXTENSIONS.join(", "),
                });
            }
            state.uploads_in_flight += 1;
            state.error = None;
            state.success = None;
            file
        };

        let outcome = self.backend.upload_guideline(&file).await;

        {
            let mut state = self.lock();
            state.uploads_in_flight = state.uploads_in_flight.saturating_sub(1);
            match &outcome {
                Ok(_) => {
                    state.selected = None;
                    state.success = Some(self.strings.upload_succeeded.to_string());
                }
                Err(e) => {
                    error!(filename = %file.name, error = %e, "guideline upload failed");
                    state.error = Some(self.strings.upload_failed.to_string());
                }
            }
        }

        let result = outcome?;
        // A failed refresh leaves its own notice; the upload itself succeeded.
        let _ = self.refresh().await;
        Ok(result)
    }

    /// Select `file` and upload it.
    pub async fn upload_file(&self, file: UploadFile) -> Result<UploadResult> {
        self.select_file(file);
        self.upload().await
    }

    /// Delete a guideline after `confirm` approves. Declining returns
    /// [`Error::UserCancelledConfirmation`] and touches nothing.
    pub async fn delete(&self, filename: &str, confirm: &dyn Confirm) -> Result<DeleteResult> {
        if !confirm
            .confirm(&self.strings.delete_confirm_for(filename))
            .await
        {
            debug!(filename, "delete cancelled by user");
            return Err(Error::UserCancelledConfirmation);
        }

        match self.backend.delete_guideline(filename).await {
            Ok(result) => {
                self.lock().success = Some(self.strings.delete_succeeded_for(filename));
                let _ = self.refresh().await;
                Ok(result)
            }
            Err(e) => {
                error!(filename, error = %e, "guideline delete failed");
                self.lock().error = Some(self.strings.delete_failed.to_string());
                Err(e)
            }
        }
    }

    /// Replace the cached list with the server's.
    ///
    /// Returns `Ok(false)` when a newer refresh already landed and this
    /// result was discarded. On failure the previous list stays visible.
    pub async fn refresh(&self) -> Result<bool> {
        let ticket = self.issued_tickets.fetch_add(1, Ordering::SeqCst) + 1;
        let outcome = self.backend.list_guidelines().await;

        let mut state = self.lock();
        if ticket < state.applied_ticket {
            debug!(ticket, applied = state.applied_ticket, "discarding stale guideline list");
            return match outcome {
                Ok(_) => Ok(false),
                Err(e) => Err(e),
            };
        }
        match outcome {
            Ok(list) => {
                debug!(ticket, count = list.len(), "guideline list refreshed");
                state.guidelines = list;
                state.applied_ticket = ticket;
                Ok(true)
            }
            Err(e) => {
                error!(ticket, error = %e, "guideline list refresh failed");
                state.error = Some(self.strings.list_failed.to_string());
                Err(e)
            }
        }
    }

    /// Raw content of one guideline.
    pub async fn content(&self, filename: &str) -> Result<String> {
        self.backend
            .fetch_guideline_content(filename)
            .await
            .map_err(|e| {
                error!(filename, error = %e, "guideline fetch failed");
                self.lock().error = Some(self.strings.content_failed.to_string());
                e
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{BackendCall, InMemoryBackend};
    use std::time::Duration;

    fn manager(backend: &Arc<InMemoryBackend>) -> GuidelineManager {
        GuidelineManager::new(backend.clone(), Locale::English)
    }

    fn upload_call() -> BackendCall {
        BackendCall::Upload {
            filename: String::new(),
        }
    }

    #[test]
    fn allowed_extensions() {
        for ok in ["a.txt", "a.md", "a.markdown", "a.pdf", "A.PDF", "x.y.Md"] {
            assert!(is_allowed_file(ok), "{ok}");
        }
        for bad in ["notes.docx", "pdf", "a.pdf.exe", "a.", ""] {
            assert!(!is_allowed_file(bad), "{bad}");
        }
    }

    #[tokio::test]
    async fn unsupported_type_makes_no_request() {
        let backend = Arc::new(InMemoryBackend::new());
        let m = manager(&backend);
        let err = m
            .upload_file(UploadFile::new("notes.docx", b"x".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType { .. }));
        assert!(backend.calls().is_empty());
        assert_eq!(
            m.error_notice().as_deref(),
            Some(Locale::English.strings().unsupported_file_type)
        );
        // The rejected file stays selected so the user can see what was picked.
        assert_eq!(m.selected_name().as_deref(), Some("notes.docx"));
    }

    #[tokio::test]
    async fn upload_without_selection() {
        let backend = Arc::new(InMemoryBackend::new());
        let m = manager(&backend);
        assert!(matches!(m.upload().await, Err(Error::NoFileSelected)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn upload_clears_selection_and_refreshes() {
        let backend = Arc::new(InMemoryBackend::new());
        let m = manager(&backend);
        m.upload_file(UploadFile::new("notes.pdf", vec![0; 2048]))
            .await
            .unwrap();

        assert_eq!(backend.count(&upload_call()), 1);
        assert_eq!(backend.count(&BackendCall::ListGuidelines), 1);
        assert_eq!(m.selected_name(), None);
        assert!(!m.is_uploading());
        assert_eq!(m.guidelines(), vec![Guideline::new("notes.pdf", 2048)]);
        assert_eq!(
            m.notices(),
            vec![Notice {
                kind: NoticeKind::Success,
                text: Locale::English.strings().upload_succeeded.to_string()
            }]
        );
    }

    #[tokio::test]
    async fn failed_upload_keeps_selection() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.fail_next(
            upload_call(),
            Error::Server {
                status: 500,
                message: "disk full".into(),
            },
        );
        let m = manager(&backend);
        assert!(m
            .upload_file(UploadFile::new("a.md", b"# a".to_vec()))
            .await
            .is_err());
        assert_eq!(m.selected_name().as_deref(), Some("a.md"));
        assert_eq!(backend.count(&BackendCall::ListGuidelines), 0);
        // Raw server detail never reaches the notice.
        assert_eq!(
            m.error_notice().as_deref(),
            Some(Locale::English.strings().upload_failed)
        );
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let backend = Arc::new(InMemoryBackend::new().with_guideline("a.md", "alpha"));
        let m = manager(&backend);
        m.refresh().await.unwrap();

        let err = m.delete("a.md", &false).await.unwrap_err();
        assert!(err.is_cancellation());
        assert!(m.notices().is_empty());
        assert_eq!(backend.stored().len(), 1);

        m.delete("a.md", &true).await.unwrap();
        assert!(m.guidelines().is_empty());
        assert_eq!(m.success_notice().as_deref(), Some("\"a.md\" was deleted."));
    }

    #[tokio::test]
    async fn list_reflects_server_not_local_removal() {
        // Another client re-uploaded a file between the delete and the refresh;
        // the cache must show exactly what the server lists.
        let backend = Arc::new(
            InMemoryBackend::new()
                .with_guideline("a.md", "alpha")
                .with_guideline("b.md", "beta"),
        );
        let m = manager(&backend);
        m.refresh().await.unwrap();
        m.delete("a.md", &true).await.unwrap();
        assert_eq!(m.guidelines(), backend.stored());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_list() {
        let backend = Arc::new(InMemoryBackend::new().with_guideline("a.md", "alpha"));
        let m = manager(&backend);
        m.refresh().await.unwrap();
        backend.fail_next(
            BackendCall::ListGuidelines,
            Error::network_with_context("down", Default::default()),
        );
        assert!(m.refresh().await.is_err());
        assert_eq!(m.guidelines().len(), 1);
        assert_eq!(
            m.error_notice().as_deref(),
            Some(Locale::English.strings().list_failed)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stale_refresh_is_discarded() {
        let backend = Arc::new(InMemoryBackend::new().with_guideline("a.md", "alpha"));
        let m = manager(&backend);
        backend.delay_next_list(Duration::from_millis(500));

        let slow = m.refresh();
        let fast = async {
            // Let the slow refresh take its snapshot first.
            tokio::time::sleep(Duration::from_millis(10)).await;
            backend
                .upload_guideline(&UploadFile::new("b.md", b"beta".to_vec()))
                .await
                .unwrap();
            m.refresh().await
        };
        let (slow, fast) = tokio::join!(slow, fast);

        assert!(fast.unwrap());
        assert!(!slow.unwrap());
        assert_eq!(m.guidelines().len(), 2);
    }

    #[tokio::test]
    async fn content_failure_sets_notice() {
        let backend = Arc::new(InMemoryBackend::new().with_guideline("a.md", "alpha"));
        let m = manager(&backend);
        assert_eq!(m.content("a.md").await.unwrap(), "alpha");
        assert!(m.content("missing.md").await.is_err());
        assert_eq!(
            m.error_notice().as_deref(),
            Some(Locale::English.strings().content_failed)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_uploads_stay_busy_until_the_last_finishes() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.delay_next_upload(Duration::from_millis(10));
        backend.delay_next_upload(Duration::from_millis(50));
        let m = manager(&backend);

        let busy_after_first = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            m.is_uploading()
        };
        let (a, b, busy) = tokio::join!(
            m.upload_file(UploadFile::new("a.md", b"a".to_vec())),
            m.upload_file(UploadFile::new("b.md", b"b".to_vec())),
            busy_after_first,
        );

        a.unwrap();
        b.unwrap();
        assert!(busy);
        assert!(!m.is_uploading());
        assert_eq!(backend.count(&upload_call()), 2);
    }
}
