//! `reqwest`-backed transport
//!
//! Redirect-following is disabled on the underlying client: a redirect from
//! the completion endpoint is the success signal of the authentication flow,
//! so the orchestrator must observe it rather than have the HTTP layer
//! swallow it.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::redirect::Policy;
use serde_json::Value;
use url::Url;

use super::{RpResponse, RpTransport, TransportError};
use crate::settings::RelyingPartySettings;

/// HTTP transport to the relying party
pub struct HttpTransport {
    client: reqwest::Client,
    base: Url,
    csrf_header: String,
}

impl HttpTransport {
    /// Create a transport for the configured relying party.
    ///
    /// No client-side timeout is applied; the server-issued challenge
    /// options carry the only timeout in the protocol, and it is enforced by
    /// the credential platform, not the network layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the underlying
    /// HTTP client cannot be constructed.
    pub fn new(settings: &RelyingPartySettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .context("Failed to build HTTP client")?;
        let base = Url::parse(&settings.base_url)
            .with_context(|| format!("Invalid relying party base URL: {}", settings.base_url))?;
        Ok(Self {
            client,
            base,
            csrf_header: settings.csrf_header.clone(),
        })
    }
}

#[async_trait]
impl RpTransport for HttpTransport {
    async fn post(
        &self,
        path: &str,
        csrf_token: &str,
        body: Option<Value>,
    ) -> Result<RpResponse, TransportError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| TransportError::Endpoint(format!("{path}: {e}")))?;

        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(self.csrf_header.as_str(), csrf_token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let redirect = if response.status().is_redirection() {
            response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(|location| {
                    // Resolve a relative Location against the base URL so the
                    // page context receives an absolute navigation target.
                    self.base
                        .join(location)
                        .map_or_else(|_| location.to_string(), |url| url.to_string())
                })
        } else {
            None
        };
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        log::debug!("POST {path} -> {status}");
        Ok(RpResponse {
            status,
            redirect,
            body,
        })
    }
}
