//! HTTP transport: one pooled `reqwest::Client` with a fixed timeout, and the
//! mapping from transport outcomes onto [`crate::Error`].

mod http;

pub use http::HttpTransport;
