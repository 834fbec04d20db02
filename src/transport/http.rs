use crate::{Error, ErrorContext, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub struct HttpTransport {
    client: reqwest::Client,
    api_base: Url,
}

impl HttpTransport {
    pub fn new(api_base: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(|e| {
                Error::configuration_with_context(
                    format!("Failed to create HTTP client: {}", e),
                    ErrorContext::new().with_source("transport"),
                )
            })?;
        Ok(Self { client, api_base })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Resolve path segments under the API base. Each segment is
    /// percent-encoded, so filenames containing `/`, `?` or spaces stay one segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::request_setup_with_context(
                    "API base URL cannot be a base",
                    ErrorContext::new().with_details(self.api_base.to_string()),
                )
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str], source: &str) -> Result<T> {
        let url = self.endpoint(segments)?;
        let body = self.execute(self.client.get(url), source).await?;
        decode(&body, source)
    }

    pub async fn get_text(&self, segments: &[&str], source: &str) -> Result<String> {
        let url = self.endpoint(segments)?;
        self.execute(self.client.get(url), source).await
    }

    pub async fn post_json<B, T>(&self, segments: &[&str], body: &B, source: &str) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let body = self.execute(self.client.post(url).json(body), source).await?;
        decode(&body, source)
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        form: reqwest::multipart::Form,
        source: &str,
    ) -> Result<T> {
        let url = self.endpoint(segments)?;
        let body = self
            .execute(self.client.post(url).multipart(form), source)
            .await?;
        decode(&body, source)
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, segments: &[&str], source: &str) -> Result<T> {
        let url = self.endpoint(segments)?;
        let body = self.execute(self.client.delete(url), source).await?;
        decode(&body, source)
    }

    /// Send and return the body of a 2xx response; everything else becomes an error.
    async fn execute(&self, request: reqwest::RequestBuilder, source: &str) -> Result<String> {
        let response = request
            .send()
            .await
            .map_err(|e| classify_send_error(e, source))?;
        let status = response.status();
        debug!(source, status = status.as_u16(), "response received");

        if !status.is_success() {
            // The status already arrived; an unreadable body only loses the detail.
            let body = response.text().await.unwrap_or_else(|e| {
                debug!(source, error = %e, "error body unreadable");
                String::new()
            });
            return Err(Error::from_response_body(status.as_u16(), &body));
        }

        response.text().await.map_err(|e| {
            Error::network_with_context(
                format!("Failed to read response body: {}", e),
                ErrorContext::new().with_source(source),
            )
        })
    }
}

/// Builder failures never left the process; anything else means no response arrived.
fn classify_send_error(e: reqwest::Error, source: &str) -> Error {
    if e.is_builder() {
        return Error::request_setup_with_context(
            e.to_string(),
            ErrorContext::new().with_source(source),
        );
    }
    let details = if e.is_timeout() {
        "timed out"
    } else if e.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    Error::network_with_context(
        e.to_string(),
        ErrorContext::new().with_source(source).with_details(details),
    )
}

fn decode<T: DeserializeOwned>(body: &str, source: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        debug!(source, error = %e, "undecodable response body");
        Error::Serialization(e)
    })
}
