//! Credential-platform interface
//!
//! The local credential primitive: one call to assert an existing passkey
//! and one to create a new one. Both may suspend indefinitely until the user
//! interacts with an authenticator or cancels. Requests carry raw binary
//! buffers; decoding from the wire encoding is the orchestrator's job.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure reported by the credential platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticatorError {
    /// The user dismissed the authenticator prompt
    Cancelled,
    /// Any other platform failure, with the platform message when it has one
    Failed(Option<String>),
}

impl fmt::Display for AuthenticatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthenticatorError::Cancelled => write!(f, "cancelled by the user"),
            AuthenticatorError::Failed(Some(msg)) => write!(f, "{msg}"),
            AuthenticatorError::Failed(None) => write!(f, "credential platform failure"),
        }
    }
}

impl std::error::Error for AuthenticatorError {}

/// Relying party information passed through to the platform verbatim
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RelyingParty {
    pub id: String,   // Domain name (e.g., "example.com")
    pub name: String, // Display name
}

/// User entity for credential creation; the handle is already decoded
#[derive(Clone, Debug)]
pub struct UserEntity {
    pub id: Vec<u8>,          // Raw user handle
    pub name: String,         // Username (e.g., email)
    pub display_name: String, // Display name
}

/// Accepted public-key algorithm, passed through verbatim
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CredentialParameters {
    pub r#type: String, // Always "public-key"
    pub alg: i32,       // COSE algorithm identifier (-7 for ES256)
}

/// Authenticator selection policy, passed through verbatim
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorSelection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authenticator_attachment: Option<String>, // "platform", "cross-platform"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resident_key: Option<String>, // "required", "preferred", "discouraged"
    #[serde(default)]
    pub require_resident_key: bool,
    #[serde(default)]
    pub user_verification: Option<String>,
}

/// Parameters for asserting an existing credential
#[derive(Clone, Debug)]
pub struct AssertionRequest {
    pub challenge: Vec<u8>,
    pub rp_id: String,
    pub user_verification: String, // "required", "preferred", "discouraged"
    pub timeout: u32,              // Milliseconds, from the challenge options
    /// Raw credential ids scoping the assertion; empty means discoverable
    pub allow_credentials: Vec<Vec<u8>>,
}

/// Parameters for creating a new credential
#[derive(Clone, Debug)]
pub struct CreationRequest {
    pub challenge: Vec<u8>,
    pub rp: RelyingParty,
    pub user: UserEntity,
    pub pub_key_cred_params: Vec<CredentialParameters>,
    pub authenticator_selection: AuthenticatorSelection,
    pub attestation: String, // "none", "indirect", "direct"
    /// Raw ids of the account's existing credentials, to prevent duplicates
    pub exclude_credentials: Vec<Vec<u8>>,
    pub timeout: u32,
}

/// Assertion produced during authentication
#[derive(Clone, Debug)]
pub struct AssertionResult {
    pub credential_id: Vec<u8>,
    pub authenticator_data: Vec<u8>,
    pub signature: Vec<u8>,
    pub client_data_json: Vec<u8>,
}

/// Attestation produced during registration
#[derive(Clone, Debug)]
pub struct AttestationResult {
    pub credential_id: Vec<u8>,
    pub attestation_object: Vec<u8>,
    pub client_data_json: Vec<u8>,
}

/// Local credential-platform primitive
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Static capability check, performed once when a registration component
    /// mounts. Not retried for the lifetime of the component.
    fn is_supported(&self) -> bool;

    /// Ask the platform to assert an existing credential.
    ///
    /// May suspend until the user completes or dismisses the prompt.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::Cancelled` when the user dismisses the
    /// prompt, `AuthenticatorError::Failed` for any other platform failure.
    async fn get_assertion(
        &self,
        request: AssertionRequest,
    ) -> Result<AssertionResult, AuthenticatorError>;

    /// Ask the platform to create a new credential.
    ///
    /// May suspend until the user completes or dismisses the prompt.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::Cancelled` when the user dismisses the
    /// prompt, `AuthenticatorError::Failed` for any other platform failure.
    async fn create_credential(
        &self,
        request: CreationRequest,
    ) -> Result<AttestationResult, AuthenticatorError>;
}
