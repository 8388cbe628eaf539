/// RAG service HTTP client implementation.
///
/// This module provides `RagClient` for making synchronous JSON requests to
/// the service, along with the error type and the single response
/// interpretation routine shared by every endpoint.
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::config::{ClientConfig, ConfigError};
use crate::models::{QueryRequest, QueryResult, ServiceStatus, UploadReceipt, UploadRequest};

/// Errors that can occur when talking to the RAG service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not complete (connection refused, DNS, reset, ...)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The configured request timeout elapsed
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// Non-success status without an application error message
    #[error("HTTP error! Status: {status}")]
    Http { status: u16 },

    /// The service reported an error through the `error` field; shown verbatim
    #[error("{message}")]
    Service { message: String },

    /// A success body that was not valid JSON or not the expected shape
    #[error("Invalid response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The client could not be configured
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// Returns the HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            Self::Network(e) | Self::Timeout(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout(error)
    } else {
        ApiError::Network(error)
    }
}

/// Trait for RAG service operations.
///
/// The controller only depends on this trait, which keeps it testable with
/// mock implementations.
pub trait RagClientTrait: Send + Sync {
    /// Submits text for indexing via `POST /upload`.
    fn upload(&self, request: &UploadRequest) -> Result<UploadReceipt, ApiError>;

    /// Asks a question via `POST /query`.
    fn query(&self, request: &QueryRequest) -> Result<QueryResult, ApiError>;

    /// Checks service liveness via `GET /`.
    fn health(&self) -> Result<ServiceStatus, ApiError>;
}

/// Builder for constructing `RagClient` instances.
///
/// # Examples
///
/// ```
/// use minirag::{ClientConfig, RagClientBuilder};
///
/// let config = ClientConfig::builder()
///     .base_url("http://localhost:8000")
///     .build()
///     .expect("valid config");
/// let client = RagClientBuilder::new()
///     .config(config)
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.base_url(), "http://localhost:8000");
/// ```
#[derive(Debug, Default)]
pub struct RagClientBuilder {
    config: Option<ClientConfig>,
}

impl RagClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an explicit configuration instead of resolving one from the environment.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the `RagClient`.
    ///
    /// If `config()` was not called, configuration is resolved with
    /// [`ClientConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` for invalid configuration and
    /// `ApiError::Network` if the HTTP client cannot be created.
    pub fn build(self) -> Result<RagClient, ApiError> {
        let config = match self.config {
            Some(config) => config,
            None => ClientConfig::from_env()?,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ApiError::Network)?;

        Ok(RagClient { client, config })
    }
}

/// Synchronous HTTP client for the RAG service.
///
/// Each call is a single best-effort attempt; there is no retry.
pub struct RagClient {
    client: reqwest::blocking::Client,
    config: ClientConfig,
}

impl RagClient {
    /// Returns the base URL this client talks to.
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends `body` as JSON and interprets the reply.
    fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        tracing::debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(transport_error)?;

        read_json(response)
    }

    fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let url = self.config.endpoint(path);
        tracing::debug!(%url, "GET");

        let response = self.client.get(&url).send().map_err(transport_error)?;

        read_json(response)
    }
}

impl RagClientTrait for RagClient {
    fn upload(&self, request: &UploadRequest) -> Result<UploadReceipt, ApiError> {
        self.post_json("/upload", request)
    }

    fn query(&self, request: &QueryRequest) -> Result<QueryResult, ApiError> {
        self.post_json("/query", request)
    }

    fn health(&self) -> Result<ServiceStatus, ApiError> {
        self.get_json("/")
    }
}

fn read_json<R: DeserializeOwned>(response: reqwest::blocking::Response) -> Result<R, ApiError> {
    let status = response.status().as_u16();
    let body = response.text().map_err(transport_error)?;
    tracing::debug!(status, bytes = body.len(), "response received");

    let value = interpret_response(status, &body)?;
    serde_json::from_value(value).map_err(ApiError::Decode)
}

/// Interprets a raw response, detecting application errors before looking at
/// the HTTP status.
///
/// The body is parsed regardless of status. A truthy `error` field (also when
/// wrapped as `[{"error": ...}, 500]`) fails with [`ApiError::Service`] even
/// on 2xx. Otherwise any non-2xx status fails with [`ApiError::Http`].
///
/// # Examples
///
/// ```
/// use minirag::api::{ApiError, interpret_response};
///
/// let err = interpret_response(200, r#"{"error": "bad text"}"#).unwrap_err();
/// assert!(matches!(err, ApiError::Service { ref message } if message == "bad text"));
///
/// let err = interpret_response(502, r#"{}"#).unwrap_err();
/// assert_eq!(err.to_string(), "HTTP error! Status: 502");
/// ```
pub fn interpret_response(status: u16, body: &str) -> Result<Value, ApiError> {
    let success = (200..300).contains(&status);

    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) if !success => return Err(ApiError::Http { status }),
        Err(e) => return Err(ApiError::Decode(e)),
    };

    if let Some(message) = application_error(&value) {
        return Err(ApiError::Service { message });
    }

    if !success {
        return Err(ApiError::Http { status });
    }

    Ok(value)
}

/// Extracts a truthy `error` field from a body or from the first element of
/// an array envelope.
fn application_error(body: &Value) -> Option<String> {
    let envelope = match body {
        Value::Array(items) => items.first()?,
        other => other,
    };

    envelope
        .get("error")
        .filter(|value| is_truthy(value))
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
