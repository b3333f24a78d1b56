//! Signal surface between the host view and the flows
//!
//! Inbound begin-signals are plain deserializable payloads so a host can
//! feed them straight off its event bus. Outbound signals go through a
//! callback table the host registers at attach time, rather than ambient
//! listeners.

use serde::Deserialize;

/// Payload of the `begin-authentication` signal
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BeginAuthentication {
    /// Base64URL credential ids scoping the assertion to a specific account
    /// context (elevated-privilege re-authentication); absent means
    /// discoverable sign-in
    #[serde(default)]
    pub allow_credentials: Option<Vec<String>>,
    /// Where to land after a successful elevated re-authentication
    #[serde(default)]
    pub sudo_return_to: Option<String>,
}

/// Payload of the `begin-registration` signal
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BeginRegistration {
    /// Human-readable label for the new credential
    #[serde(default)]
    pub label: Option<String>,
}

/// Callbacks an authentication host registers at attach time
pub trait AuthenticationView: Send + Sync {
    /// One `auth-error` signal; `error` is `"cancelled"` when the user
    /// dismissed the prompt
    fn auth_error(&self, error: &str);
}

/// Callbacks a registration host registers at attach time
pub trait RegistrationView: Send + Sync {
    /// One `register-error` signal; `error` is `"cancelled"` when the user
    /// dismissed the prompt
    fn register_error(&self, error: &str);

    /// One `registered` signal carrying the new credential's id and label
    fn registered(&self, id: &str, label: Option<&str>);

    /// The platform cannot create credentials; reveal the "not supported"
    /// affordance and hide the enroll affordance. Raised at most once, at
    /// attach time.
    fn passkeys_unsupported(&self);
}

/// Terminal outcome of one flow invocation
///
/// Exactly one outcome is produced per begin-signal: no outcome is reported
/// twice and no flow terminates silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// The server answered the completion with a redirect and the page was
    /// navigated there (authentication success)
    Redirected(String),
    /// The completion unexpectedly answered success without a redirect; the
    /// page was reloaded as a conservative fallback
    Reloaded,
    /// A new credential was enrolled (registration success)
    Registered { id: String, label: Option<String> },
    /// The flow failed; the message was reported to the host view
    Errored(String),
}
