#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the passlink crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod codec;
pub mod errors;
pub mod flow;
pub mod platform;
pub mod settings;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use errors::FlowError;
pub use flow::{
    AuthenticationView, BeginAuthentication, BeginRegistration, FlowOutcome,
    PasskeyAuthentication, PasskeyRegistration, RegistrationView,
};
pub use platform::{Authenticator, AuthenticatorError, PageContext};
pub use settings::PasslinkSettings;
pub use transport::{HttpTransport, RpResponse, RpTransport, TransportError};
