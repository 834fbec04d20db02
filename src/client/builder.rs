use crate::client::core::ApiClient;
use crate::config::ClientConfig;
use crate::transport::HttpTransport;
use crate::Result;
use std::time::Duration;

/// Builder for [`ApiClient`].
///
/// Starts from [`ClientConfig::default`]; use [`ApiClientBuilder::from_config`]
/// to start from a loaded configuration instead.
pub struct ApiClientBuilder {
    config: ClientConfig,
    timeout: Option<Duration>,
}

impl ApiClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            timeout: None,
        }
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            timeout: None,
        }
    }

    /// Server origin, e.g. `http://localhost:5000`. Primarily overridden in tests.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.api_prefix = prefix.into();
        self
    }

    /// Overrides `timeout_secs` from the configuration with a finer-grained value.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        let api_base = self.config.api_base()?;
        let transport = HttpTransport::new(api_base, self.timeout.unwrap_or_else(|| self.config.timeout()))?;
        Ok(ApiClient::new(transport))
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
