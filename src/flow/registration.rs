//! Registration handshake orchestrator
//!
//! Drives `Idle → AwaitingChallenge → AwaitingLocalCreation →
//! AwaitingServerVerdict → {Registered | Errored}`. Attach performs the
//! one-time platform capability check; an unsupported platform never arms
//! the begin-handler for the lifetime of the component.

use std::sync::Arc;

use crate::codec;
use crate::errors::FlowError;
use crate::flow::events::{BeginRegistration, FlowOutcome, RegistrationView};
use crate::flow::types::{
    error_message, RegistrationChallenge, RegistrationCompletion, RegistrationVerdict,
};
use crate::platform::{
    Authenticator, AuthenticatorError, CreationRequest, PageContext, UserEntity,
};
use crate::settings::RelyingPartySettings;
use crate::transport::RpTransport;

const BEGIN_FALLBACK: &str = "Failed to start registration";
const COMPLETE_FALLBACK: &str = "Registration failed";

/// Passkey enrollment component for an account-settings page
pub struct PasskeyRegistration {
    relying_party: RelyingPartySettings,
    transport: Arc<dyn RpTransport>,
    authenticator: Arc<dyn Authenticator>,
    page: Arc<dyn PageContext>,
    view: Arc<dyn RegistrationView>,
    armed: bool,
}

impl PasskeyRegistration {
    /// Mount the component over its injected collaborators.
    ///
    /// Checks platform credential support exactly once. When absent, the
    /// host view is told to reveal its "not supported" affordance and the
    /// begin-handler is never armed; the check is not retried for this
    /// component's lifetime.
    #[must_use]
    pub fn attach(
        relying_party: RelyingPartySettings,
        transport: Arc<dyn RpTransport>,
        authenticator: Arc<dyn Authenticator>,
        page: Arc<dyn PageContext>,
        view: Arc<dyn RegistrationView>,
    ) -> Self {
        let armed = authenticator.is_supported();
        if !armed {
            log::info!("credential platform unsupported, passkey enrollment disabled");
            view.passkeys_unsupported();
        }
        Self {
            relying_party,
            transport,
            authenticator,
            page,
            view,
            armed,
        }
    }

    /// Whether the begin-handler was armed at attach time.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Handle one `begin-registration` signal.
    ///
    /// Returns `None` without any outbound call when the platform was
    /// unsupported at attach time. Otherwise produces exactly one terminal
    /// outcome: a single `registered` signal or a single `register-error`.
    pub async fn begin(&self, signal: BeginRegistration) -> Option<FlowOutcome> {
        if !self.armed {
            return None;
        }
        Some(match self.run(signal).await {
            Ok(outcome) => outcome,
            Err(err) => {
                log::warn!("passkey registration failed: {err}");
                let message = err.surface_message();
                self.view.register_error(&message);
                FlowOutcome::Errored(message)
            }
        })
    }

    async fn run(&self, signal: BeginRegistration) -> Result<FlowOutcome, FlowError> {
        // AwaitingChallenge
        let token = self.csrf_token()?;
        let reply = self
            .transport
            .post(&self.relying_party.register_begin_path, &token, None)
            .await
            .map_err(|e| FlowError::ChallengeRequest(e.to_string()))?;
        if !reply.is_success() {
            return Err(FlowError::ChallengeRequest(error_message(
                &reply.body,
                BEGIN_FALLBACK,
            )));
        }
        let challenge: RegistrationChallenge = serde_json::from_str(&reply.body)
            .map_err(|_| FlowError::MalformedResponse(reply.status))?;

        // AwaitingLocalCreation; suspends until the user acts
        let request = build_creation_request(&challenge)?;
        let attestation = self
            .authenticator
            .create_credential(request)
            .await
            .map_err(|e| match e {
                AuthenticatorError::Cancelled => FlowError::Cancelled,
                AuthenticatorError::Failed(message) => {
                    FlowError::Platform(message.unwrap_or_else(|| COMPLETE_FALLBACK.to_string()))
                }
            })?;

        // AwaitingServerVerdict; the token is re-read for every
        // state-changing request
        let token = self.csrf_token()?;
        let completion = RegistrationCompletion {
            attestation_object: codec::encode(&attestation.attestation_object),
            client_data_json: codec::encode(&attestation.client_data_json),
            label: signal.label,
        };
        let body = serde_json::to_value(&completion)
            .map_err(|e| FlowError::Encoding(e.to_string()))?;
        let reply = self
            .transport
            .post(&self.relying_party.register_complete_path, &token, Some(body))
            .await
            .map_err(|e| FlowError::CompletionRejected(e.to_string()))?;

        // The verdict must be JSON whatever the status; a parse failure is
        // itself an error outcome carrying the HTTP status.
        let verdict: RegistrationVerdict = serde_json::from_str(&reply.body)
            .map_err(|_| FlowError::MalformedResponse(reply.status))?;

        if reply.is_success() && verdict.ok {
            let id = verdict.id.unwrap_or_default();
            log::debug!("passkey registered: {id}");
            self.view.registered(&id, verdict.label.as_deref());
            return Ok(FlowOutcome::Registered {
                id,
                label: verdict.label,
            });
        }
        Err(FlowError::CompletionRejected(
            verdict
                .error
                .unwrap_or_else(|| COMPLETE_FALLBACK.to_string()),
        ))
    }

    fn csrf_token(&self) -> Result<String, FlowError> {
        self.page.csrf_token().ok_or(FlowError::MissingCsrfToken)
    }
}

/// Build the local creation parameters from the challenge options.
///
/// The challenge, user handle and exclude-list ids are decoded; relying
/// party, user names, algorithm list, authenticator selection and the
/// attestation preference pass through verbatim.
fn build_creation_request(challenge: &RegistrationChallenge) -> Result<CreationRequest, FlowError> {
    let challenge_bytes = codec::decode(&challenge.challenge)
        .map_err(|e| FlowError::Encoding(format!("challenge: {e}")))?;
    let user_handle = codec::decode(&challenge.user.id)
        .map_err(|e| FlowError::Encoding(format!("user handle: {e}")))?;
    let exclude_credentials = challenge
        .exclude_credentials
        .iter()
        .map(|descriptor| {
            codec::decode(&descriptor.id)
                .map_err(|e| FlowError::Encoding(format!("credential id: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CreationRequest {
        challenge: challenge_bytes,
        rp: challenge.rp.clone(),
        user: UserEntity {
            id: user_handle,
            name: challenge.user.name.clone(),
            display_name: challenge.user.display_name.clone(),
        },
        pub_key_cred_params: challenge.pub_key_cred_params.clone(),
        authenticator_selection: challenge.authenticator_selection.clone(),
        attestation: challenge.attestation.clone(),
        exclude_credentials,
        timeout: challenge.timeout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::types::CredentialDescriptor;
    use crate::platform::{AuthenticatorSelection, CredentialParameters, RelyingParty};

    fn challenge() -> RegistrationChallenge {
        RegistrationChallenge {
            challenge: codec::encode([4, 5, 6]),
            rp: RelyingParty {
                id: "example.com".to_string(),
                name: "Example".to_string(),
            },
            user: crate::flow::types::UserOptions {
                id: codec::encode([0xDE, 0xAD]),
                name: "pat@example.com".to_string(),
                display_name: "Pat".to_string(),
            },
            pub_key_cred_params: vec![CredentialParameters {
                r#type: "public-key".to_string(),
                alg: -7,
            }],
            authenticator_selection: AuthenticatorSelection::default(),
            attestation: "none".to_string(),
            exclude_credentials: vec![CredentialDescriptor {
                r#type: "public-key".to_string(),
                id: codec::encode([1]),
            }],
            timeout: 60_000,
        }
    }

    #[test]
    fn decodes_challenge_handle_and_exclusions() {
        let request = build_creation_request(&challenge()).unwrap();
        assert_eq!(request.challenge, vec![4, 5, 6]);
        assert_eq!(request.user.id, vec![0xDE, 0xAD]);
        assert_eq!(request.exclude_credentials, vec![vec![1]]);
    }

    #[test]
    fn passes_policy_fields_through_verbatim() {
        let request = build_creation_request(&challenge()).unwrap();
        assert_eq!(request.attestation, "none");
        assert_eq!(request.pub_key_cred_params[0].alg, -7);
        assert_eq!(request.user.display_name, "Pat");
    }

    #[test]
    fn malformed_user_handle_fails_loudly() {
        let mut bad = challenge();
        bad.user.id = "A".to_string();
        assert!(matches!(
            build_creation_request(&bad),
            Err(FlowError::Encoding(_))
        ));
    }
}
