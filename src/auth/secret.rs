//! Consumer and token secrets that never leak through formatting.

// self
use crate::{_prelude::*, oauth::percent_encode};

/// Consumer or token secret, redacted in `Debug` and `Display`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);
impl Secret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Whether the secret is the empty string.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// RFC 3986 form of the secret as it appears on either side of the `&` in a signing key.
	pub fn signing_part(&self) -> String {
		percent_encode(&self.0)
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		// An empty token secret is legitimate during the request-token step; say so.
		let shown = if self.is_empty() { "<empty>" } else { "<redacted>" };

		f.debug_tuple("Secret").field(&shown).finish()
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
impl From<&str> for Secret {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for Secret {
	fn from(value: String) -> Self {
		Self(value)
	}
}
