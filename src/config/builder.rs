// self
use crate::{
	_prelude::*,
	auth::{Secret, SignatureMethod},
	config::{ClientConfig, Endpoints},
	error::ConfigError,
};

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	config: ClientConfig,
	api_base: Option<String>,
	upload_base: Option<String>,
}
impl ClientConfigBuilder {
	/// Creates a builder seeded with the consumer pair and default options.
	pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<Secret>) -> Self {
		let config = ClientConfig {
			consumer_key: consumer_key.into(),
			consumer_secret: Some(consumer_secret.into()),
			..Default::default()
		};

		Self { config, api_base: None, upload_base: None }
	}

	/// Overrides `api_ver` (default `2.0`).
	pub fn api_ver(mut self, api_ver: impl Into<String>) -> Self {
		self.config.api_ver = api_ver.into();

		self
	}

	/// Sets the application name used in the `User-Agent`.
	pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
		self.config.app_name = Some(app_name.into());

		self
	}

	/// Overrides the content type (default `application/json`).
	pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
		self.config.content_type = content_type.into();

		self
	}

	/// Overrides the signature method (default HMAC-SHA1).
	pub fn signature_method(mut self, method: SignatureMethod) -> Self {
		self.config.signature_method = method;

		self
	}

	/// Overrides `oauth_version` (default `1.0`).
	pub fn oauth_version(mut self, version: impl Into<String>) -> Self {
		self.config.oauth_version = version.into();

		self
	}

	/// Sets the access token pair.
	pub fn token(mut self, token_id: impl Into<String>, token_secret: impl Into<Secret>) -> Self {
		self.config.token_id = Some(token_id.into());
		self.config.token_secret = Some(token_secret.into());

		self
	}

	/// Overrides the request-token callback (default `oob`).
	pub fn oauth_callback(mut self, callback: impl Into<String>) -> Self {
		self.config.oauth_callback = callback.into();

		self
	}

	/// Overrides the redirect bound (default 5).
	pub fn max_redirects(mut self, max_redirects: u8) -> Self {
		self.config.max_redirects = max_redirects;

		self
	}

	/// Points every API endpoint at a different host.
	pub fn api_base(mut self, base: impl Into<String>) -> Self {
		self.api_base = Some(base.into());

		self
	}

	/// Points uploads at a different host.
	pub fn upload_base(mut self, base: impl Into<String>) -> Self {
		self.upload_base = Some(base.into());

		self
	}

	/// Consumes the builder and validates the resulting config.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let Self { mut config, api_base, upload_base } = self;
		let defaults = Endpoints::default();

		config.endpoints = Endpoints::new(
			api_base.unwrap_or(defaults.api),
			upload_base.unwrap_or(defaults.upload),
		);
		config.validate()?;

		Ok(config)
	}
}
