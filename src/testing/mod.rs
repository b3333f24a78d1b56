//! Unified testing utilities for passlink
//!
//! This module consolidates the mock collaborators and fixtures the flow
//! tests need into a single location. It is compiled only for unit tests or
//! when the `testing` feature is enabled.
//!
//! ## Organization
//!
//! - [`fixtures`] - Pre-built wire bodies and authenticator outputs
//! - [`mock`] - Substitutable collaborators (transport, authenticator,
//!   page context, host view)

pub mod fixtures;
pub mod mock;

// Re-export commonly used items for convenience
pub use fixtures::TestFixtures;
pub use mock::{MockAuthenticator, MockPage, RecordingView, ScriptedTransport, ViewEvent};

/// Common test constants
pub mod constants {
    /// Default test anti-forgery token
    pub const TEST_CSRF_TOKEN: &str = "test-csrf-token";

    /// Default test relying party id
    pub const TEST_RP_ID: &str = "example.com";

    /// Default test challenge bytes
    pub const TEST_CHALLENGE: &[u8] = &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    /// Default test credential id bytes
    pub const TEST_CREDENTIAL_ID: &[u8] = &[0xC0, 0xFF, 0xEE, 0x01];

    /// Default test user handle bytes
    pub const TEST_USER_HANDLE: &[u8] = &[0xAB, 0xCD, 0xEF];

    /// Default test email address
    pub const TEST_EMAIL: &str = "test@example.com";

    /// Default test user name
    pub const TEST_USER_NAME: &str = "Test User";
}
