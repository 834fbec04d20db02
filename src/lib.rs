//! # medvise-client
//!
//! Client for the Medvise retrieval-augmented chat assistant.
//!
//! Users upload reference documents ("guidelines") and ask questions; the
//! backend answers from those documents and may attach a nutrition
//! prediction table and source excerpts. Retrieval, inference and prediction
//! all live behind the backend's REST API. This crate is the client side:
//! the HTTP calls, the conversation state machine, the guideline panel and
//! message rendering.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use medvise_client::{App, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> medvise_client::Result<()> {
//!     let config = ClientConfig::load(None).await?;
//!     let mut app = App::from_config(&config)?;
//!     app.start().await;
//!
//!     if let Some(reply) = app.send("Glucose 130, albumin 2.9, BUN 18").await {
//!         println!("{}", reply.content);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | [`Backend`] trait, HTTP [`ApiClient`] and an in-memory backend |
//! | [`transport`] | reqwest transport and error normalization |
//! | [`conversation`] | Message log and request lifecycle state machine |
//! | [`guidelines`] | Upload, list and delete of reference documents |
//! | [`render`] | Pure message rendering and terminal layout |
//! | [`app`] | Root composition |
//! | [`config`] | Defaults, YAML file and environment configuration |
//! | [`locale`] | User-facing strings |
//! | [`types`] | Messages, guidelines and wire types |

pub mod app;
pub mod client;
pub mod config;
pub mod conversation;
pub mod guidelines;
pub mod locale;
pub mod render;
pub mod transport;
pub mod types;

pub use app::App;
pub use client::{ApiClient, ApiClientBuilder, Backend, InMemoryBackend};
pub use config::ClientConfig;
pub use conversation::{Conversation, PendingTurn, Phase};
pub use guidelines::{Confirm, GuidelineManager};
pub use locale::Locale;
pub use types::{ChatResponse, Guideline, Message, MessageKind, Prediction, Reference, UploadFile};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
