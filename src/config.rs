//! Client configuration.
//!
//! The service base URL is injected here rather than baked into the client,
//! so every environment (and every test) can point at its own server.

use std::time::Duration;

use thiserror::Error;

/// Environment variable holding the service base URL.
pub const API_URL_ENV: &str = "MINIRAG_API_URL";
/// Environment variable holding an optional request timeout in seconds.
pub const TIMEOUT_ENV: &str = "MINIRAG_TIMEOUT_SECS";
/// Base URL used when neither the builder nor the environment sets one.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Errors raised while resolving configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid timeout {value:?}: expected a whole number of seconds")]
    InvalidTimeout { value: String },
}

/// Resolved settings for talking to the RAG service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// Returns a builder. Equivalent to `ClientConfigBuilder::new()`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Resolves configuration purely from the environment and defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        ClientConfigBuilder::new().build()
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whole-request timeout; `None` lets a request run until the transport gives up.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Joins an endpoint path (e.g. `/upload`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Builder for [`ClientConfig`].
///
/// Each setting resolves from the builder value first, then the environment,
/// then the default.
///
/// # Examples
///
/// ```
/// use minirag::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("https://rag.example.com/")
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url(), "https://rag.example.com");
/// assert_eq!(config.endpoint("/query"), "https://rag.example.com/query");
/// ```
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the service base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets a whole-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolves and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if the base URL does not parse, and
    /// [`ConfigError::InvalidTimeout`] if `MINIRAG_TIMEOUT_SECS` is not a number.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        };
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        reqwest::Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let timeout = match self.timeout {
            Some(timeout) => Some(timeout),
            None => match std::env::var(TIMEOUT_ENV) {
                Ok(value) if !value.trim().is_empty() => {
                    let secs = value
                        .trim()
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidTimeout { value })?;
                    Some(Duration::from_secs(secs))
                }
                _ => None,
            },
        };

        Ok(ClientConfig { base_url, timeout })
    }
}
