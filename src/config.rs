//! Client configuration: constructor options, endpoint bases, and validation.

mod builder;

pub use builder::*;

// self
use crate::{
	_prelude::*,
	auth::{Credentials, Secret, SignatureMethod},
	error::ConfigError,
};

/// Default API host.
pub const DEFAULT_API_BASE: &str = "https://api.smugmug.com";
/// Default binary upload host.
pub const DEFAULT_UPLOAD_BASE: &str = "https://upload.smugmug.com";
/// Default content type used for `Accept`/`Content-Type` and response decoding.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
/// Default redirect bound.
pub const DEFAULT_MAX_REDIRECTS: u8 = 5;

/// Options fixed at client construction.
///
/// Secrets are skipped when serializing so a config can be dumped for diagnostics.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
	/// Value sent as `X-Smug-Version` on uploads.
	pub api_ver: String,
	/// Application name prefixed to the `User-Agent`.
	pub app_name: Option<String>,
	/// Content type for `Accept`/`Content-Type`; responses of this type are parsed as JSON.
	pub content_type: String,
	/// OAuth signature method.
	pub signature_method: SignatureMethod,
	/// Value advertised in `oauth_version`.
	pub oauth_version: String,
	/// Access token identifier.
	pub token_id: Option<String>,
	/// Access token secret.
	#[serde(skip_serializing)]
	pub token_secret: Option<Secret>,
	/// Application consumer key.
	pub consumer_key: String,
	/// Application consumer secret.
	#[serde(skip_serializing)]
	pub consumer_secret: Option<Secret>,
	/// Callback sent on the request-token step.
	pub oauth_callback: String,
	/// Maximum number of redirect hops followed per call.
	pub max_redirects: u8,
	/// Service base URLs.
	pub endpoints: Endpoints,
}
impl ClientConfig {
	/// Starts a builder for the given consumer pair.
	pub fn builder(
		consumer_key: impl Into<String>,
		consumer_secret: impl Into<Secret>,
	) -> ClientConfigBuilder {
		ClientConfigBuilder::new(consumer_key, consumer_secret)
	}

	/// Checks the invariants enforced by [`ClientConfigBuilder::build`].
	///
	/// Deserialized configs should be validated before use.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.consumer_key.is_empty() {
			return Err(ConfigError::MissingConsumerKey);
		}
		if self.consumer_secret.is_none() {
			return Err(ConfigError::MissingConsumerSecret);
		}
		if self.content_type.trim().is_empty() {
			return Err(ConfigError::EmptyContentType);
		}
		if self.max_redirects == 0 {
			return Err(ConfigError::ZeroRedirects);
		}

		self.endpoints.validate()
	}

	/// Immutable credential set derived from this config.
	pub fn credentials(&self) -> Credentials {
		Credentials {
			consumer_key: self.consumer_key.clone(),
			consumer_secret: self.consumer_secret.clone(),
			token: self.token_id.clone(),
			token_secret: self.token_secret.clone(),
			signature_method: self.signature_method,
			oauth_version: self.oauth_version.clone(),
		}
	}

	/// `User-Agent` header value.
	pub fn user_agent(&self) -> String {
		let agent = format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

		match self.app_name.as_deref() {
			Some(app) if !app.is_empty() => format!("{app} using {agent}"),
			_ => agent,
		}
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			api_ver: "2.0".into(),
			app_name: None,
			content_type: DEFAULT_CONTENT_TYPE.into(),
			signature_method: SignatureMethod::default(),
			oauth_version: "1.0".into(),
			token_id: None,
			token_secret: None,
			consumer_key: String::new(),
			consumer_secret: None,
			oauth_callback: "oob".into(),
			max_redirects: DEFAULT_MAX_REDIRECTS,
			endpoints: Endpoints::default(),
		}
	}
}

/// Service base URLs from which every endpoint template is derived.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
	/// API host, for example `https://api.smugmug.com`.
	pub api: String,
	/// Upload host, for example `https://upload.smugmug.com`.
	pub upload: String,
}
impl Endpoints {
	/// Creates endpoint bases, trimming trailing slashes.
	pub fn new(api: impl Into<String>, upload: impl Into<String>) -> Self {
		Self { api: trim_base(api.into()), upload: trim_base(upload.into()) }
	}

	/// `{api}/services/oauth/1.0a`.
	pub fn access_base(&self) -> String {
		format!("{}/services/oauth/1.0a", self.api)
	}

	/// `{api}/api/v2`.
	pub fn base(&self) -> String {
		format!("{}/api/v2", self.api)
	}

	/// `{base}/album`.
	pub fn album_base(&self) -> String {
		format!("{}/album", self.base())
	}

	/// `{base}/folder/user`.
	pub fn folder_base(&self) -> String {
		format!("{}/folder/user", self.base())
	}

	/// `{base}/image`.
	pub fn image_base(&self) -> String {
		format!("{}/image", self.base())
	}

	/// Upload host.
	pub fn upload_base(&self) -> &str {
		&self.upload
	}

	fn validate(&self) -> Result<(), ConfigError> {
		validate_endpoint("api", &self.api)?;
		validate_endpoint("upload", &self.upload)
	}
}
impl Default for Endpoints {
	fn default() -> Self {
		Self::new(DEFAULT_API_BASE, DEFAULT_UPLOAD_BASE)
	}
}

fn trim_base(mut base: String) -> String {
	while base.ends_with('/') {
		base.pop();
	}

	base
}

fn validate_endpoint(name: &'static str, value: &str) -> Result<(), ConfigError> {
	let url = Url::parse(value).map_err(|source| ConfigError::InvalidEndpoint {
		endpoint: name,
		value: value.to_owned(),
		source,
	})?;

	if matches!(url.scheme(), "http" | "https") {
		Ok(())
	} else {
		Err(ConfigError::UnsupportedScheme { endpoint: name, value: value.to_owned() })
	}
}
