//! End-user authorization URL and the OAuth token-exchange steps.

// self
use crate::{
	_prelude::*,
	auth::TokenResponse,
	client::Client,
	error::ConfigError,
	http::Transport,
	router::{Args, LegacyMethod},
	sanitize::Sanitizer,
};

/// Access level requested on the authorize page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Access {
	/// Public content only.
	#[default]
	Public,
	/// Public and private content.
	Full,
}
impl Access {
	/// Query value.
	pub const fn as_str(self) -> &'static str {
		match self {
			Access::Public => "Public",
			Access::Full => "Full",
		}
	}
}

/// Permissions requested on the authorize page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permissions {
	/// Read-only.
	#[default]
	Read,
	/// Read and add.
	Add,
	/// Read, add, and modify.
	Modify,
}
impl Permissions {
	/// Query value.
	pub const fn as_str(self) -> &'static str {
		match self {
			Permissions::Read => "Read",
			Permissions::Add => "Add",
			Permissions::Modify => "Modify",
		}
	}
}

impl<T, S> Client<T, S>
where
	T: ?Sized + Transport,
	S: ?Sized + Sanitizer,
{
	/// Builds `{accessBase}/authorize?Access=..&Permissions=..&oauth_token=..`.
	///
	/// Pure construction with no signing. `token_id` defaults to the client's current token
	/// (normally the request token just fetched).
	pub fn authorize_url(
		&self,
		access: Access,
		permissions: Permissions,
		token_id: Option<&str>,
	) -> Result<Url> {
		let token = match token_id {
			Some(token) if !token.is_empty() => token,
			_ => self.credentials.require_token()?,
		};
		let raw = format!("{}/authorize", self.config.endpoints.access_base());
		let mut url = Url::parse(&raw).map_err(|source| ConfigError::InvalidEndpoint {
			endpoint: "accessBase",
			value: raw.clone(),
			source,
		})?;

		url.query_pairs_mut()
			.append_pair("Access", access.as_str())
			.append_pair("Permissions", permissions.as_str())
			.append_pair("oauth_token", token);

		Ok(url)
	}

	/// Runs `auth_getRequestToken` and parses the issued request token.
	///
	/// `callback` falls back to the configured `oauth_callback` (`oob` by default).
	pub async fn fetch_request_token(&self, callback: Option<&str>) -> Result<TokenResponse> {
		let callback = callback.unwrap_or(self.config.oauth_callback.as_str());
		let reply = self
			.call(LegacyMethod::AuthGetRequestToken, &Args::new().with("oauth_callback", callback))
			.await?;

		Ok(TokenResponse::from_form(&reply.into_text())?)
	}

	/// Runs `auth_getAccessToken` with the verifier the user was shown, signing with the current
	/// (request) token, and parses the issued access token.
	pub async fn fetch_access_token(&self, verifier: &str) -> Result<TokenResponse> {
		let args = Args::new()
			.with("oauth_callback", self.config.oauth_callback.as_str())
			.with("OauthVerifier", verifier);
		let reply = self.call(LegacyMethod::AuthGetAccessToken, &args).await?;

		Ok(TokenResponse::from_form(&reply.into_text())?)
	}
}
