//! Credentials, signature methods, redacted secrets, and token-exchange responses.

pub mod credentials;
pub mod secret;
pub mod token;

pub use credentials::*;
pub use secret::*;
pub use token::*;
