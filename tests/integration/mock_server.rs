//! Mock HTTP server setup for integration tests

use medvise_client::ApiClient;
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::io::Write;
use std::time::Duration;

/// Test fixture that owns a mock backend and builds clients against it.
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Client pointed at the mock server with the default `/api` prefix.
    pub fn client(&self) -> ApiClient {
        self.client_with_timeout(Duration::from_secs(5))
    }

    pub fn client_with_timeout(&self, timeout: Duration) -> ApiClient {
        ApiClient::builder()
            .base_url(self.base_url.clone())
            .timeout(timeout)
            .build()
            .expect("client for mock server")
    }

    /// JSON response for `method path`.
    pub async fn mock_json(&mut self, method: &str, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// `POST /api/chat` that only matches the given request JSON.
    pub async fn mock_chat(&mut self, request: serde_json::Value, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", "/api/chat")
            .match_body(Matcher::Json(request))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Sends `status` and headers immediately and stalls the body for `delay`.
    pub async fn mock_stalled(
        &mut self,
        method: &str,
        path: &str,
        status: usize,
        delay: Duration,
    ) -> Mock {
        self.server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_chunked_body(move |w| {
                std::thread::sleep(delay);
                w.write_all(b"{}")
            })
            .create_async()
            .await
    }
}
