//! Client configuration.
//!
//! Layers, lowest precedence first: built-in defaults, an optional YAML file,
//! `MEDVISE_*` environment variables, then whatever the caller sets explicitly
//! (the CLI applies its flags last).
//!
//! ```yaml
//! base_url: http://medvise.internal:5000
//! api_prefix: /api
//! timeout_secs: 30
//! locale: ko
//! ```

use crate::locale::Locale;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_BASE_URL: &str = "MEDVISE_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "MEDVISE_HTTP_TIMEOUT_SECS";
pub const ENV_LOCALE: &str = "MEDVISE_LOCALE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_prefix: String,
    pub timeout_secs: u64,
    #[serde(deserialize_with = "deserialize_locale")]
    pub locale: Locale,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            locale: Locale::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults, overlaid with the file at `path` (if given) and then the environment.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::from_file(p).await?,
            None => Self::default(),
        };
        config.apply_env_with(|key| std::env::var(key).ok())
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::configuration_with_context(
                format!("failed to read config file: {}", e),
                ErrorContext::new().with_source(path.to_string_lossy()),
            )
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid config: {}", e),
                ErrorContext::new().with_source("config"),
            )
        })
    }

    /// Overlay `MEDVISE_*` variables resolved through `lookup`.
    ///
    /// Unparseable timeouts are ignored like the other numeric env knobs;
    /// an unknown locale is an error since it changes every visible string.
    pub fn apply_env_with<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|s| !s.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS).and_then(|s| s.parse::<u64>().ok()) {
            self.timeout_secs = secs;
        }
        if let Some(locale) = lookup(ENV_LOCALE) {
            self.locale = locale.parse()?;
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// `base_url` joined with `api_prefix`, e.g. `http://localhost:5000/api`.
    pub fn api_base(&self) -> Result<Url> {
        let mut url = Url::parse(self.base_url.trim()).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid base URL: {}", e),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(self.base_url.clone()),
            )
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::configuration_with_context(
                "base URL must use http or https",
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(self.base_url.clone()),
            ));
        }
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::configuration_with_context(
                    "base URL cannot carry a path",
                    ErrorContext::new().with_field_path("base_url"),
                )
            })?;
            segments.pop_if_empty();
            segments.extend(self.api_prefix.split('/').filter(|s| !s.is_empty()));
        }
        Ok(url)
    }
}

fn deserialize_locale<'de, D>(deserializer: D) -> std::result::Result<Locale, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}
