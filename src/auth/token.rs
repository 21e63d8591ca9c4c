//! Token-exchange response parsing for the request-token and access-token steps.

// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

const OAUTH_TOKEN_KEY: &str = "oauth_token";
const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";

/// Token pair returned by `getRequestToken` / `getAccessToken`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenResponse {
	/// Issued token identifier.
	pub oauth_token: String,
	/// Secret paired with the token.
	pub oauth_token_secret: Secret,
	/// Every other key in the response (for example `oauth_callback_confirmed`).
	pub remain: BTreeMap<String, String>,
}
impl TokenResponse {
	/// Parses an `application/x-www-form-urlencoded` token body.
	pub fn from_form(body: &str) -> Result<Self, ConfigError> {
		let mut remain = url::form_urlencoded::parse(body.trim().as_bytes())
			.map(|(k, v)| (k.into_owned(), v.into_owned()))
			.collect::<BTreeMap<_, _>>();
		let oauth_token = remain
			.remove(OAUTH_TOKEN_KEY)
			.ok_or(ConfigError::TokenResponseMissing { key: OAUTH_TOKEN_KEY })?;
		let oauth_token_secret = remain
			.remove(OAUTH_TOKEN_SECRET_KEY)
			.ok_or(ConfigError::TokenResponseMissing { key: OAUTH_TOKEN_SECRET_KEY })?;

		Ok(Self { oauth_token, oauth_token_secret: Secret::new(oauth_token_secret), remain })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parses_token_pair_and_extras() {
		let parsed = TokenResponse::from_form(
			"oauth_token=ab3cd9j4ks73hf7g&oauth_token_secret=xyz4992k83j47x0b&oauth_callback_confirmed=true",
		)
		.expect("Token body should parse.");

		assert_eq!(parsed.oauth_token, "ab3cd9j4ks73hf7g");
		assert_eq!(parsed.oauth_token_secret.expose(), "xyz4992k83j47x0b");
		assert_eq!(parsed.remain.get("oauth_callback_confirmed").map(String::as_str), Some("true"));
	}

	#[test]
	fn decodes_escaped_values() {
		let parsed = TokenResponse::from_form("oauth_token=a%2Bb&oauth_token_secret=c%26d\n")
			.expect("Escaped body should parse.");

		assert_eq!(parsed.oauth_token, "a+b");
		assert_eq!(parsed.oauth_token_secret.expose(), "c&d");
	}

	#[test]
	fn missing_keys_are_reported() {
		assert!(matches!(
			TokenResponse::from_form("oauth_token_secret=x"),
			Err(ConfigError::TokenResponseMissing { key: "oauth_token" })
		));
		assert!(matches!(
			TokenResponse::from_form("oauth_token=x"),
			Err(ConfigError::TokenResponseMissing { key: "oauth_token_secret" })
		));
	}
}
