//! Wire structures for the handshake endpoints
//!
//! Challenge options arrive camelCase; completion bodies are posted
//! snake_case. Binary values travel as URL-safe unpadded base64 text and are
//! only converted at the credential-platform boundary.

use serde::{Deserialize, Serialize};

use crate::platform::{AuthenticatorSelection, CredentialParameters, RelyingParty};

/// Challenge options issued by the authentication-begin endpoint
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationChallenge {
    pub challenge: String, // Base64URL-encoded random challenge
    pub rp_id: String,     // Relying party ID
    pub user_verification: String, // "required", "preferred", "discouraged"
    pub timeout: u32,      // Timeout in milliseconds
    /// Server-scoped allow-list; absent for discoverable sign-in
    #[serde(default)]
    pub allow_credentials: Vec<CredentialDescriptor>,
}

/// Challenge options issued by the registration-begin endpoint
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationChallenge {
    pub challenge: String, // Base64URL-encoded random challenge
    pub rp: RelyingParty,
    pub user: UserOptions,
    pub pub_key_cred_params: Vec<CredentialParameters>,
    pub authenticator_selection: AuthenticatorSelection,
    pub attestation: String, // "none", "indirect", "direct"
    /// The account's existing credentials, to prevent duplicate enrollment
    #[serde(default)]
    pub exclude_credentials: Vec<CredentialDescriptor>,
    pub timeout: u32, // Timeout in milliseconds
}

/// User entity as issued on the wire
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserOptions {
    pub id: String, // Base64URL-encoded user handle
    pub name: String,
    pub display_name: String,
}

/// Credential reference in an allow- or exclude-list
#[derive(Deserialize, Clone, Debug)]
pub struct CredentialDescriptor {
    pub r#type: String, // Always "public-key"
    pub id: String,     // Base64URL-encoded credential ID
}

/// Body posted to the authentication-completion endpoint
#[derive(Serialize, Clone, Debug)]
pub struct AuthenticationCompletion {
    pub credential_id: String,
    pub authenticator_data: String,
    pub signature: String,
    pub client_data_json: String,
    /// Post-login return path for elevated-privilege re-authentication
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sudo_return_to: Option<String>,
}

/// Body posted to the registration-completion endpoint
#[derive(Serialize, Clone, Debug)]
pub struct RegistrationCompletion {
    pub attestation_object: String,
    pub client_data_json: String,
    /// Human-readable label; serialized as `null` when the host gave none
    pub label: Option<String>,
}

/// Verdict returned by the registration-completion endpoint
#[derive(Deserialize, Clone, Debug)]
pub struct RegistrationVerdict {
    #[serde(default)]
    pub ok: bool,
    pub id: Option<String>,    // Base64URL-encoded credential ID
    pub label: Option<String>, // Label echoed back by the server
    pub error: Option<String>,
}

/// Structured error body shared by all endpoints
#[derive(Deserialize, Clone, Debug)]
pub struct ErrorBody {
    pub error: Option<String>,
}

/// Extract the server's error message from `body`, tolerating a non-JSON
/// body or a missing `error` field by substituting `fallback`.
#[must_use]
pub fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .unwrap_or_else(|| fallback.to_string())
}
