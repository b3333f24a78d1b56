//! Test fixtures providing pre-built test objects
//!
//! Wire bodies exactly as the relying party issues them, plus canned
//! authenticator outputs, so flow tests never rebuild the same JSON.

use serde_json::json;

use super::constants::{
    TEST_CHALLENGE, TEST_CREDENTIAL_ID, TEST_EMAIL, TEST_RP_ID, TEST_USER_HANDLE, TEST_USER_NAME,
};
use crate::codec;
use crate::platform::{AssertionResult, AttestationResult};
use crate::settings::RelyingPartySettings;

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Relying-party settings pointing at the default handshake endpoints
    #[must_use]
    pub fn relying_party_settings() -> RelyingPartySettings {
        RelyingPartySettings::default()
    }

    /// A challenge body as the authentication-begin endpoint issues it
    #[must_use]
    pub fn auth_challenge_body() -> String {
        json!({
            "challenge": codec::encode(TEST_CHALLENGE),
            "rpId": TEST_RP_ID,
            "userVerification": "preferred",
            "timeout": 60_000,
        })
        .to_string()
    }

    /// An authentication challenge body scoped to one credential
    #[must_use]
    pub fn auth_challenge_body_with_allow_list() -> String {
        json!({
            "challenge": codec::encode(TEST_CHALLENGE),
            "rpId": TEST_RP_ID,
            "userVerification": "required",
            "timeout": 60_000,
            "allowCredentials": [
                {"type": "public-key", "id": codec::encode(TEST_CREDENTIAL_ID)},
            ],
        })
        .to_string()
    }

    /// A challenge body as the registration-begin endpoint issues it
    #[must_use]
    pub fn registration_challenge_body() -> String {
        json!({
            "challenge": codec::encode(TEST_CHALLENGE),
            "rp": {"id": TEST_RP_ID, "name": "Example"},
            "user": {
                "id": codec::encode(TEST_USER_HANDLE),
                "name": TEST_EMAIL,
                "displayName": TEST_USER_NAME,
            },
            "pubKeyCredParams": [
                {"type": "public-key", "alg": -7},
                {"type": "public-key", "alg": -257},
            ],
            "authenticatorSelection": {
                "residentKey": "preferred",
                "userVerification": "preferred",
            },
            "attestation": "none",
            "excludeCredentials": [
                {"type": "public-key", "id": codec::encode(TEST_CREDENTIAL_ID)},
            ],
            "timeout": 60_000,
        })
        .to_string()
    }

    /// An assertion as the credential platform produces it
    #[must_use]
    pub fn assertion() -> AssertionResult {
        AssertionResult {
            credential_id: TEST_CREDENTIAL_ID.to_vec(),
            authenticator_data: vec![0x10, 0x11, 0x12],
            signature: vec![0x20, 0x21, 0x22, 0x23],
            client_data_json: br#"{"type":"webauthn.get"}"#.to_vec(),
        }
    }

    /// An attestation as the credential platform produces it
    #[must_use]
    pub fn attestation() -> AttestationResult {
        AttestationResult {
            credential_id: TEST_CREDENTIAL_ID.to_vec(),
            attestation_object: vec![0x30, 0x31, 0x32, 0x33, 0x34],
            client_data_json: br#"{"type":"webauthn.create"}"#.to_vec(),
        }
    }
}
