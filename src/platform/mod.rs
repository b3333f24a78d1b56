//! Injected platform capabilities
//!
//! The handshake orchestrators never touch the host page or the credential
//! platform directly; both are reached through the traits in this module so
//! the flows stay testable without a real browser context.

mod authenticator;
mod page;

pub use authenticator::{
    AssertionRequest, AssertionResult, AttestationResult, Authenticator, AuthenticatorError,
    AuthenticatorSelection, CreationRequest, CredentialParameters, RelyingParty, UserEntity,
};
pub use page::PageContext;
