use thiserror::Error;

/// Structured error context for diagnostics.
///
/// Never shown to the end user; it exists so logs can say which call and
/// which field went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "config.base_url", "chat.history")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "chat", "guidelines.upload")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the Medvise client.
///
/// Transport failures collapse into three categories (`Network`, `Server`,
/// `RequestSetup`); the remaining variants are raised locally before any
/// request is made.
#[derive(Debug, Error)]
pub enum Error {
    /// No response reached the client (connection failure, timeout, body cut short).
    #[error("Network error: {message}{}", format_context(.context))]
    Network {
        message: String,
        context: ErrorContext,
    },

    /// A response arrived with a non-success status.
    #[error("Server error: HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// The request could not be constructed before transmission.
    #[error("Request setup error: {message}{}", format_context(.context))]
    RequestSetup {
        message: String,
        context: ErrorContext,
    },

    #[error("Unsupported file type: {filename} (allowed: {allowed})")]
    UnsupportedFileType { filename: String, allowed: String },

    #[error("No file selected")]
    NoFileSelected,

    /// The user declined a destructive action. Not a failure.
    #[error("Cancelled by user")]
    UserCancelledConfirmation,

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn network_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Network {
            message: msg.into(),
            context,
        }
    }

    pub fn request_setup_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::RequestSetup {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Build a `Server` error from a status and the raw response body.
    ///
    /// The body's `error` string is used verbatim when present.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| GENERIC_SERVER_MESSAGE.to_string());
        Error::Server { status, message }
    }

    /// True for the destructive-action abort, which callers treat as a no-op.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::UserCancelledConfirmation)
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Network { context, .. }
            | Error::RequestSetup { context, .. }
            | Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}

pub(crate) const GENERIC_SERVER_MESSAGE: &str = "The server returned an error";
