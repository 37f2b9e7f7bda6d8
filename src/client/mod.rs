//! HTTP transport for the registry API
//!
//! A thin wrapper over [`reqwest::Client`] that classifies failures into an
//! explicit error taxonomy and enforces a per-request timeout. The transport
//! never retries; recovery decisions belong to the callers.

use bytes::Bytes;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Per-request timeout.
///
/// The registry occasionally stalls on large statement pages; without this the
/// whole pipeline hangs on a single company.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Non-2xx HTTP status
    #[error("HTTP status {code}: {body}")]
    Status {
        /// Status code returned by the server
        code: u16,
        /// Response body, when readable
        body: String,
    },

    /// Connection could not be established
    #[error("connection error: {0}")]
    Connection(String),

    /// Request exceeded [`REQUEST_TIMEOUT`]
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Response body could not be decoded
    #[error("decode error: {0}")]
    Decode(String),

    /// Any other request failure
    #[error("request error: {0}")]
    Request(String),
}

impl ClientError {
    /// Short diagnostic hint for status codes the registry is known to emit.
    pub fn status_hint(code: u16) -> Option<&'static str> {
        match code {
            403 => Some("WAF limit exceeded"),
            429 => Some("rate limit exceeded"),
            500 => Some("internal server error; the registry may still have processed the request"),
            _ => None,
        }
    }
}

/// Result type for transport operations
pub type ClientResult<T> = Result<T, ClientError>;

/// HTTP client for the registry endpoints.
///
/// All registry calls are unauthenticated GETs returning JSON (catalog
/// endpoints) or binary (document endpoint).
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Create a client with the default [`REQUEST_TIMEOUT`].
    pub fn new() -> ClientResult<Self> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    /// Create a client with an explicit timeout.
    pub fn with_timeout(timeout: Duration) -> ClientResult<Self> {
        let inner = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Request(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Execute a GET and deserialize the JSON response.
    pub async fn get_json<T>(&self, url: &str) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.get(url).await?;
        response.json::<T>().await.map_err(classify)
    }

    /// Execute a GET and return the raw response body.
    pub async fn get_bytes(&self, url: &str) -> ClientResult<Bytes> {
        let response = self.get(url).await?;
        response.bytes().await.map_err(classify)
    }

    async fn get(&self, url: &str) -> ClientResult<reqwest::Response> {
        debug!("GET {url}");

        let response = self.inner.get(url).send().await.map_err(classify)?;
        let status = response.status();

        if !status.is_success() {
            let code = status.as_u16();
            if let Some(hint) = ClientError::status_hint(code) {
                warn!("HTTP {code} from registry: {hint}");
            }
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Status { code, body });
        }

        Ok(response)
    }
}

/// Map a reqwest failure onto the transport taxonomy.
fn classify(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout(err.to_string())
    } else if err.is_connect() {
        ClientError::Connection(err.to_string())
    } else if err.is_decode() {
        ClientError::Decode(err.to_string())
    } else {
        ClientError::Request(err.to_string())
    }
}
