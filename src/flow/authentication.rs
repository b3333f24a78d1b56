//! Authentication handshake orchestrator
//!
//! Drives `Idle → AwaitingChallenge → AwaitingLocalAssertion →
//! AwaitingServerVerdict → {Redirected | Errored}`: request a challenge,
//! invoke the local assertion primitive, submit the result, then follow the
//! server's redirect or report exactly one error.

use std::sync::Arc;

use crate::codec;
use crate::errors::FlowError;
use crate::flow::events::{AuthenticationView, BeginAuthentication, FlowOutcome};
use crate::flow::types::{error_message, AuthenticationChallenge, AuthenticationCompletion};
use crate::platform::{AssertionRequest, Authenticator, AuthenticatorError, PageContext};
use crate::settings::RelyingPartySettings;
use crate::transport::RpTransport;

const BEGIN_FALLBACK: &str = "Failed to start authentication";
const COMPLETE_FALLBACK: &str = "Authentication failed";

/// Passkey sign-in component for a login page
pub struct PasskeyAuthentication {
    relying_party: RelyingPartySettings,
    transport: Arc<dyn RpTransport>,
    authenticator: Arc<dyn Authenticator>,
    page: Arc<dyn PageContext>,
    view: Arc<dyn AuthenticationView>,
}

impl PasskeyAuthentication {
    /// Mount the component over its injected collaborators.
    #[must_use]
    pub fn attach(
        relying_party: RelyingPartySettings,
        transport: Arc<dyn RpTransport>,
        authenticator: Arc<dyn Authenticator>,
        page: Arc<dyn PageContext>,
        view: Arc<dyn AuthenticationView>,
    ) -> Self {
        Self {
            relying_party,
            transport,
            authenticator,
            page,
            view,
        }
    }

    /// Handle one `begin-authentication` signal.
    ///
    /// Produces exactly one terminal outcome: a followed redirect, a reload,
    /// or a single `auth-error` signal. The host must not issue a second
    /// begin-signal while one is outstanding.
    pub async fn begin(&self, signal: BeginAuthentication) -> FlowOutcome {
        match self.run(signal).await {
            Ok(outcome) => outcome,
            Err(err) => {
                log::warn!("passkey authentication failed: {err}");
                let message = err.surface_message();
                self.view.auth_error(&message);
                FlowOutcome::Errored(message)
            }
        }
    }

    async fn run(&self, signal: BeginAuthentication) -> Result<FlowOutcome, FlowError> {
        // AwaitingChallenge
        let token = self.csrf_token()?;
        let reply = self
            .transport
            .post(&self.relying_party.auth_begin_path, &token, None)
            .await
            .map_err(|e| FlowError::ChallengeRequest(e.to_string()))?;
        if !reply.is_success() {
            return Err(FlowError::ChallengeRequest(error_message(
                &reply.body,
                BEGIN_FALLBACK,
            )));
        }
        let challenge: AuthenticationChallenge = serde_json::from_str(&reply.body)
            .map_err(|_| FlowError::MalformedResponse(reply.status))?;

        // AwaitingLocalAssertion; suspends until the user acts
        let request = build_assertion_request(&challenge, &signal)?;
        let assertion = self
            .authenticator
            .get_assertion(request)
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
        let completion = AuthenticationCompletion {
            credential_id: codec::encode(&assertion.credential_id),
            authenticator_data: codec::encode(&assertion.authenticator_data),
            signature: codec::encode(&assertion.signature),
            client_data_json: codec::encode(&assertion.client_data_json),
            sudo_return_to: signal.sudo_return_to,
        };
        let body = serde_json::to_value(&completion)
            .map_err(|e| FlowError::Encoding(e.to_string()))?;
        let reply = self
            .transport
            .post(&self.relying_party.auth_complete_path, &token, Some(body))
            .await
            .map_err(|e| FlowError::CompletionRejected(e.to_string()))?;

        if let Some(location) = reply.redirect {
            // The server established a session; following its redirect is
            // the success path.
            log::debug!("authentication complete, following redirect");
            self.page.visit(&location);
            return Ok(FlowOutcome::Redirected(location));
        }
        if !reply.is_success() {
            return Err(FlowError::CompletionRejected(error_message(
                &reply.body,
                COMPLETE_FALLBACK,
            )));
        }
        // A non-redirect success is outside the contract; reload rather
        // than guess at the session state.
        log::warn!(
            "completion endpoint answered {} without a redirect, reloading",
            reply.status
        );
        self.page.reload();
        Ok(FlowOutcome::Reloaded)
    }

    fn csrf_token(&self) -> Result<String, FlowError> {
        self.page.csrf_token().ok_or(FlowError::MissingCsrfToken)
    }
}

/// Build the local invocation parameters from the challenge options.
///
/// The begin-signal allow-list (sudo re-auth) wins over a server-issued one;
/// with neither, the request is discoverable.
fn build_assertion_request(
    challenge: &AuthenticationChallenge,
    signal: &BeginAuthentication,
) -> Result<AssertionRequest, FlowError> {
    let challenge_bytes = codec::decode(&challenge.challenge)
        .map_err(|e| FlowError::Encoding(format!("challenge: {e}")))?;

    let allow_ids: Vec<&str> = match &signal.allow_credentials {
        Some(ids) => ids.iter().map(String::as_str).collect(),
        None => challenge
            .allow_credentials
            .iter()
            .map(|descriptor| descriptor.id.as_str())
            .collect(),
    };
    let allow_credentials = allow_ids
        .into_iter()
        .map(|id| codec::decode(id).map_err(|e| FlowError::Encoding(format!("credential id: {e}"))))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AssertionRequest {
        challenge: challenge_bytes,
        rp_id: challenge.rp_id.clone(),
        user_verification: challenge.user_verification.clone(),
        timeout: challenge.timeout,
        allow_credentials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::types::CredentialDescriptor;

    fn challenge() -> AuthenticationChallenge {
        AuthenticationChallenge {
            challenge: codec::encode([1, 2, 3, 4]),
            rp_id: "example.com".to_string(),
            user_verification: "preferred".to_string(),
            timeout: 60_000,
            allow_credentials: vec![CredentialDescriptor {
                r#type: "public-key".to_string(),
                id: codec::encode([9, 9]),
            }],
        }
    }

    #[test]
    fn signal_allow_list_wins_over_server_list() {
        let signal = BeginAuthentication {
            allow_credentials: Some(vec![codec::encode([7, 7, 7])]),
            sudo_return_to: None,
        };
        let request = build_assertion_request(&challenge(), &signal).unwrap();
        assert_eq!(request.allow_credentials, vec![vec![7, 7, 7]]);
    }

    #[test]
    fn server_allow_list_used_when_signal_has_none() {
        let request =
            build_assertion_request(&challenge(), &BeginAuthentication::default()).unwrap();
        assert_eq!(request.allow_credentials, vec![vec![9, 9]]);
        assert_eq!(request.challenge, vec![1, 2, 3, 4]);
    }

    #[test]
    fn malformed_credential_id_fails_loudly() {
        let signal = BeginAuthentication {
            allow_credentials: Some(vec!["!".to_string()]),
            sudo_return_to: None,
        };
        assert!(matches!(
            build_assertion_request(&challenge(), &signal),
            Err(FlowError::Encoding(_))
        ));
    }
}
