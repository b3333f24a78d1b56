//! Relying-party transport
//!
//! The flows talk to the relying party through the [`RpTransport`] trait so
//! network responses can be substituted in tests. The real implementation is
//! [`HttpTransport`], wrapping `reqwest`.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use serde_json::Value;

/// Transport-level failure (connection refused, DNS, TLS)
///
/// Protocol-level rejections are not transport errors; they arrive as an
/// [`RpResponse`] with a non-success status.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("invalid endpoint path: {0}")]
    Endpoint(String),
}

/// A relying-party response, with redirects left unfollowed
#[derive(Debug, Clone)]
pub struct RpResponse {
    /// HTTP status code
    pub status: u16,
    /// Resolved `Location` target when the status is a redirect
    pub redirect: Option<String>,
    /// Raw response body
    pub body: String,
}

impl RpResponse {
    /// Whether the status is in the 2xx range
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Channel to the relying-party endpoints
#[async_trait]
pub trait RpTransport: Send + Sync {
    /// `POST` a state-changing request.
    ///
    /// The anti-forgery token is attached as a request header on every call;
    /// `body` is serialized as JSON when present. The transport never
    /// follows redirects; the orchestrator interprets them.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` only when no response was obtained at all;
    /// any HTTP status, including errors and redirects, is an `Ok` response.
    async fn post(
        &self,
        path: &str,
        csrf_token: &str,
        body: Option<Value>,
    ) -> Result<RpResponse, TransportError>;
}
