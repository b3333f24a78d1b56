//! Flow error taxonomy
//!
//! Every failure a handshake can reach maps onto one of these variants, and
//! each variant surfaces exactly one descriptive message to the host view.
//! Nothing here is retried automatically; retry is a user-initiated
//! re-invocation of the begin signal.

use std::fmt;

/// Errors produced while driving a passkey handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// The begin endpoint refused the challenge request or was unreachable
    ChallengeRequest(String),

    /// The user dismissed or abandoned the authenticator prompt
    Cancelled,

    /// The local credential platform failed for another reason
    /// (no authenticator, timeout, unsupported policy)
    Platform(String),

    /// The completion endpoint rejected the submitted credential
    CompletionRejected(String),

    /// A response that had to be JSON could not be parsed; carries the
    /// HTTP status of the offending response
    MalformedResponse(u16),

    /// A server-supplied wire value could not be decoded
    Encoding(String),

    /// The anti-forgery token is absent from the page context; a deployment
    /// configuration error, not a recoverable runtime condition
    MissingCsrfToken,
}

impl FlowError {
    /// The message surfaced to the host view for this error.
    ///
    /// Cancellation surfaces the fixed reason `cancelled` so the host can
    /// render it distinctly from failure.
    #[must_use]
    pub fn surface_message(&self) -> String {
        match self {
            FlowError::ChallengeRequest(msg)
            | FlowError::Platform(msg)
            | FlowError::CompletionRejected(msg)
            | FlowError::Encoding(msg) => msg.clone(),
            FlowError::Cancelled => "cancelled".to_string(),
            FlowError::MalformedResponse(status) => format!("Server error ({status})"),
            FlowError::MissingCsrfToken => {
                "Anti-forgery token is missing from the page".to_string()
            }
        }
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::ChallengeRequest(msg) => write!(f, "Challenge request failed: {msg}"),
            FlowError::Cancelled => write!(f, "Cancelled by the user"),
            FlowError::Platform(msg) => write!(f, "Credential platform failure: {msg}"),
            FlowError::CompletionRejected(msg) => write!(f, "Completion rejected: {msg}"),
            FlowError::MalformedResponse(status) => {
                write!(f, "Malformed server response (status {status})")
            }
            FlowError::Encoding(msg) => write!(f, "Encoding error: {msg}"),
            FlowError::MissingCsrfToken => write!(f, "Anti-forgery token missing"),
        }
    }
}

impl std::error::Error for FlowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_surfaces_fixed_reason() {
        assert_eq!(FlowError::Cancelled.surface_message(), "cancelled");
    }

    #[test]
    fn malformed_response_carries_status() {
        assert_eq!(
            FlowError::MalformedResponse(502).surface_message(),
            "Server error (502)"
        );
    }

    #[test]
    fn server_message_passes_through() {
        let err = FlowError::ChallengeRequest("rate limited".to_string());
        assert_eq!(err.surface_message(), "rate limited");
    }
}
