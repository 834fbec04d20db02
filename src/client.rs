//! Client for the Medvise backend REST API.
//!
//! [`ApiClient`] talks HTTP; the rest of the crate only sees the [`Backend`]
//! trait so the conversation and guideline components can run against an
//! in-memory fake in tests.

pub mod backend;
pub mod builder;
pub mod core;
pub mod memory;

pub use backend::Backend;
pub use builder::ApiClientBuilder;
pub use core::ApiClient;
pub use memory::{BackendCall, InMemoryBackend};
