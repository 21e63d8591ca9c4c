//! Immutable OAuth 1.0a credential set shared by every call of a client.

// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Signature algorithm advertised in `oauth_signature_method`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureMethod {
	/// Keyed HMAC-SHA1 over the signature base string.
	#[default]
	#[serde(rename = "HMAC-SHA1")]
	HmacSha1,
	/// The signing key itself is the signature.
	#[serde(rename = "PLAINTEXT")]
	PlainText,
}
impl SignatureMethod {
	/// Wire name of the method.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignatureMethod::HmacSha1 => "HMAC-SHA1",
			SignatureMethod::PlainText => "PLAINTEXT",
		}
	}
}
impl Display for SignatureMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for SignatureMethod {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"HMAC-SHA1" => Ok(SignatureMethod::HmacSha1),
			"PLAINTEXT" => Ok(SignatureMethod::PlainText),
			_ => Err(ConfigError::UnsupportedSignatureMethod(s.to_owned())),
		}
	}
}

/// Consumer and token material used to sign requests.
///
/// A value is never mutated once a client holds it; rotating tokens goes through
/// [`Credentials::with_token`], which returns a fresh set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
	/// Application consumer key.
	pub consumer_key: String,
	/// Application consumer secret.
	pub consumer_secret: Option<Secret>,
	/// Access (or request) token identifier.
	pub token: Option<String>,
	/// Secret paired with [`Credentials::token`].
	pub token_secret: Option<Secret>,
	/// Signature algorithm.
	pub signature_method: SignatureMethod,
	/// Value advertised in `oauth_version`.
	pub oauth_version: String,
}
impl Credentials {
	/// Creates a consumer-only credential set using HMAC-SHA1 and OAuth `1.0`.
	pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<Secret>) -> Self {
		Self {
			consumer_key: consumer_key.into(),
			consumer_secret: Some(consumer_secret.into()),
			token: None,
			token_secret: None,
			signature_method: SignatureMethod::default(),
			oauth_version: "1.0".into(),
		}
	}

	/// Returns a copy carrying the provided token pair.
	pub fn with_token(&self, token: impl Into<String>, token_secret: impl Into<Secret>) -> Self {
		Self { token: Some(token.into()), token_secret: Some(token_secret.into()), ..self.clone() }
	}

	/// Returns a copy using a different signature method.
	pub fn with_signature_method(mut self, method: SignatureMethod) -> Self {
		self.signature_method = method;

		self
	}

	/// Token identifier required by every call other than the request-token step.
	pub fn require_token(&self) -> Result<&str, ConfigError> {
		match self.token.as_deref() {
			Some(token) if !token.is_empty() => Ok(token),
			_ => Err(ConfigError::MissingToken),
		}
	}

	/// Builds the signing key `enc(consumer_secret)&enc(token_secret)`.
	///
	/// When `token_required` is false (request-token step) an absent token secret counts as empty.
	pub fn signing_key(&self, token_required: bool) -> Result<String, ConfigError> {
		let consumer_secret =
			self.consumer_secret.as_ref().ok_or(ConfigError::MissingConsumerSecret)?;
		let token_secret = match (&self.token_secret, token_required) {
			(Some(secret), _) => secret.signing_part(),
			(None, false) => String::new(),
			(None, true) => return Err(ConfigError::MissingTokenSecret),
		};

		Ok(format!("{}&{token_secret}", consumer_secret.signing_part()))
	}
}
