//! Mock objects and fake implementations for testing
//!
//! Substitutable collaborators for isolated flow tests: a transport with
//! scripted replies, an authenticator with scripted outcomes, a page context
//! that records navigation, and a host view that records outbound signals.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::flow::{AuthenticationView, RegistrationView};
use crate::platform::{
    AssertionRequest, AssertionResult, AttestationResult, Authenticator, AuthenticatorError,
    CreationRequest, PageContext,
};
use crate::transport::{RpResponse, RpTransport, TransportError};

/// One request captured by [`ScriptedTransport`]
#[derive(Debug, Clone)]
pub struct SentRequest {
    pub path: String,
    pub csrf_token: String,
    pub body: Option<Value>,
}

/// Transport that replays scripted replies and records every request
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<RpResponse, String>>>,
    requests: Mutex<Vec<SentRequest>>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a JSON (or any body) reply with the given status
    pub fn enqueue(&self, status: u16, body: &str) {
        self.replies.lock().unwrap().push_back(Ok(RpResponse {
            status,
            redirect: None,
            body: body.to_string(),
        }));
    }

    /// Script a redirect reply pointing at `location`
    pub fn enqueue_redirect(&self, location: &str) {
        self.replies.lock().unwrap().push_back(Ok(RpResponse {
            status: 303,
            redirect: Some(location.to_string()),
            body: String::new(),
        }));
    }

    /// Script a transport-level failure (no response obtained)
    pub fn enqueue_failure(&self, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    /// Every request the flows issued, in order
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<SentRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests issued
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl RpTransport for ScriptedTransport {
    async fn post(
        &self,
        path: &str,
        csrf_token: &str,
        body: Option<Value>,
    ) -> Result<RpResponse, TransportError> {
        self.requests.lock().unwrap().push(SentRequest {
            path: path.to_string(),
            csrf_token: csrf_token.to_string(),
            body,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted reply left for request")
            .map_err(TransportError::Request)
    }
}

/// Authenticator with a configurable support flag and scripted outcomes
pub struct MockAuthenticator {
    supported: bool,
    assertion: Mutex<Option<Result<AssertionResult, AuthenticatorError>>>,
    attestation: Mutex<Option<Result<AttestationResult, AuthenticatorError>>>,
    assertion_requests: Mutex<Vec<AssertionRequest>>,
    creation_requests: Mutex<Vec<CreationRequest>>,
}

impl MockAuthenticator {
    /// A platform that supports passkeys but has nothing scripted yet
    #[must_use]
    pub fn supported() -> Self {
        Self {
            supported: true,
            assertion: Mutex::new(None),
            attestation: Mutex::new(None),
            assertion_requests: Mutex::new(Vec::new()),
            creation_requests: Mutex::new(Vec::new()),
        }
    }

    /// A platform without passkey support
    #[must_use]
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::supported()
        }
    }

    /// Script the outcome of the next `get_assertion` call
    pub fn script_assertion(&self, result: Result<AssertionResult, AuthenticatorError>) {
        *self.assertion.lock().unwrap() = Some(result);
    }

    /// Script the outcome of the next `create_credential` call
    pub fn script_attestation(&self, result: Result<AttestationResult, AuthenticatorError>) {
        *self.attestation.lock().unwrap() = Some(result);
    }

    /// Assertion requests the flows issued
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn assertion_requests(&self) -> Vec<AssertionRequest> {
        self.assertion_requests.lock().unwrap().clone()
    }

    /// Creation requests the flows issued
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn creation_requests(&self) -> Vec<CreationRequest> {
        self.creation_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn get_assertion(
        &self,
        request: AssertionRequest,
    ) -> Result<AssertionResult, AuthenticatorError> {
        self.assertion_requests.lock().unwrap().push(request);
        self.assertion
            .lock()
            .unwrap()
            .take()
            .expect("no scripted assertion outcome")
    }

    async fn create_credential(
        &self,
        request: CreationRequest,
    ) -> Result<AttestationResult, AuthenticatorError> {
        self.creation_requests.lock().unwrap().push(request);
        self.attestation
            .lock()
            .unwrap()
            .take()
            .expect("no scripted attestation outcome")
    }
}

/// Page context with a configurable token that records navigation
pub struct MockPage {
    tokens: Mutex<VecDeque<String>>,
    token_reads: AtomicUsize,
    visits: Mutex<Vec<String>>,
    reloads: AtomicUsize,
}

impl MockPage {
    /// A page whose token element always yields `token`
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self::with_tokens(&[token])
    }

    /// A page that yields each token in turn, repeating the last one;
    /// lets tests observe that the token is re-read per request
    #[must_use]
    pub fn with_tokens(tokens: &[&str]) -> Self {
        Self {
            tokens: Mutex::new(tokens.iter().map(ToString::to_string).collect()),
            token_reads: AtomicUsize::new(0),
            visits: Mutex::new(Vec::new()),
            reloads: AtomicUsize::new(0),
        }
    }

    /// A page whose token element is absent
    #[must_use]
    pub fn without_token() -> Self {
        Self::with_tokens(&[])
    }

    /// How many times the token was read
    #[must_use]
    pub fn token_reads(&self) -> usize {
        self.token_reads.load(Ordering::SeqCst)
    }

    /// Every navigation target, in order
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }

    /// How many full reloads were forced
    #[must_use]
    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl PageContext for MockPage {
    fn csrf_token(&self) -> Option<String> {
        self.token_reads.fetch_add(1, Ordering::SeqCst);
        let mut tokens = self.tokens.lock().unwrap();
        if tokens.len() > 1 {
            tokens.pop_front()
        } else {
            tokens.front().cloned()
        }
    }

    fn visit(&self, url: &str) {
        self.visits.lock().unwrap().push(url.to_string());
    }

    fn reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }
}

/// One outbound signal captured by [`RecordingView`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    AuthError(String),
    RegisterError(String),
    Registered { id: String, label: Option<String> },
    PasskeysUnsupported,
}

/// Host view that records every outbound signal
#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every signal the flows emitted, in order
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl AuthenticationView for RecordingView {
    fn auth_error(&self, error: &str) {
        self.events
            .lock()
            .unwrap()
            .push(ViewEvent::AuthError(error.to_string()));
    }
}

impl RegistrationView for RecordingView {
    fn register_error(&self, error: &str) {
        self.events
            .lock()
            .unwrap()
            .push(ViewEvent::RegisterError(error.to_string()));
    }

    fn registered(&self, id: &str, label: Option<&str>) {
        self.events.lock().unwrap().push(ViewEvent::Registered {
            id: id.to_string(),
            label: label.map(ToString::to_string),
        });
    }

    fn passkeys_unsupported(&self) {
        self.events
            .lock()
            .unwrap()
            .push(ViewEvent::PasskeysUnsupported);
    }
}
