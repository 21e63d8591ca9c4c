//! OAuth 1.0a request signing.
//!
//! Every call builds a fresh [`OAuthParams`] (new nonce, current timestamp), merges any signable
//! body parameters, and signs the canonical base string
//! `VERB&enc(endpoint)&enc(sorted key=value pairs)` with HMAC-SHA1 or PLAINTEXT.

mod encode;
mod natural;
mod signer;

pub use encode::*;
pub use natural::*;
pub use signer::*;
