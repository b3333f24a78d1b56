//! Handshake orchestrators
//!
//! The two symmetric flows of the passkey protocol: authentication asserts
//! an existing credential, registration enrolls a new one. Both share the
//! codec, the anti-forgery token read, and the transport; each reports
//! exactly one terminal outcome per begin-signal.

mod authentication;
mod events;
mod registration;
mod types;

pub use authentication::PasskeyAuthentication;
pub use events::{
    AuthenticationView, BeginAuthentication, BeginRegistration, FlowOutcome, RegistrationView,
};
pub use registration::PasskeyRegistration;
pub use types::{
    error_message, AuthenticationChallenge, AuthenticationCompletion, CredentialDescriptor,
    ErrorBody, RegistrationChallenge, RegistrationCompletion, RegistrationVerdict, UserOptions,
};
