//! # Types Module
//!
//! Strongly-typed representations of everything that crosses the wire or sits
//! in the session: chat messages, guidelines, and the request/response bodies
//! of the backend's REST API.
//!
//! ## Submodules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`message`] | Chat messages, predictions and reference excerpts |
//! | [`guideline`] | Uploaded reference documents and size formatting |
//! | [`api`] | Request and response bodies of the HTTP contract |
//!
//! ## Example
//!
//! ```rust
//! use medvise_client::types::{Message, MessageKind, Prediction};
//!
//! let reply = Message::assistant("a-1", "Here is the plan.")
//!     .with_prediction(Prediction::new().with_entry("Protein", 70.0));
//! assert_eq!(reply.kind, MessageKind::Assistant);
//! ```

pub mod api;
pub mod guideline;
pub mod message;

pub use api::{ChatRequest, ChatResponse, DeleteResult, GuidelineList, HealthStatus, UploadResult};
pub use guideline::{format_size, Guideline, UploadFile};
pub use message::{HistoryEntry, Message, MessageKind, Prediction, Reference};
