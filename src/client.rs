//! Legacy-call client: routing, signing, redirect-following dispatch, and decoding.

pub mod authorize;
pub mod upload;

mod dispatch;

pub use authorize::*;
pub use upload::*;

// crates.io
use serde_json::Value;
// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;
use crate::{
	_prelude::*,
	auth::Credentials,
	config::ClientConfig,
	http::Transport,
	obs::{self, CallOutcome, CallSpan},
	router::{Args, LegacyMethod, RequestSpec},
	sanitize::{Sanitizer, TagStripper},
};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport and tag-stripping sanitizer.
pub type ReqwestCompatClient = Client<ReqwestTransport, TagStripper>;

/// Legacy identifier routed to the upload variant by [`Client::call_named`].
pub const IMAGES_UPLOAD: &str = "images_upload";

/// Decoded response body.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
	/// Body whose content type matched the configured JSON type.
	Json(Value),
	/// Any other body, returned unparsed.
	Text(String),
}
impl Reply {
	/// JSON value, if the response was JSON.
	pub fn as_json(&self) -> Option<&Value> {
		match self {
			Reply::Json(value) => Some(value),
			Reply::Text(_) => None,
		}
	}

	/// Raw text, if the response was not JSON.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Reply::Json(_) => None,
			Reply::Text(text) => Some(text),
		}
	}

	/// Consumes the reply, rendering JSON back to text when needed.
	pub fn into_text(self) -> String {
		match self {
			Reply::Json(value) => value.to_string(),
			Reply::Text(text) => text,
		}
	}
}

/// Compatibility client bound to one credential set, transport, and sanitizer.
///
/// Only the configuration and credentials are shared between calls, and both are read-only:
/// every call computes its own nonce, timestamp, and (for uploads) file digest, so a single client
/// may serve concurrent calls.
pub struct Client<T, S = TagStripper>
where
	T: ?Sized + Transport,
	S: ?Sized + Sanitizer,
{
	/// Validated constructor options.
	pub config: Arc<ClientConfig>,
	/// Credentials used to sign every call.
	pub credentials: Arc<Credentials>,
	/// HTTP transport; must not follow redirects on its own.
	pub transport: Arc<T>,
	/// Sanitizer applied to path arguments and upload metadata.
	pub sanitizer: Arc<S>,
}
impl<T, S> Client<T, S>
where
	T: ?Sized + Transport,
	S: ?Sized + Sanitizer,
{
	/// Creates a client over the caller-provided transport and sanitizer.
	///
	/// `config` is expected to come from [`ClientConfig::builder`] (or to have passed
	/// [`ClientConfig::validate`]).
	pub fn with_transport(
		config: ClientConfig,
		transport: impl Into<Arc<T>>,
		sanitizer: impl Into<Arc<S>>,
	) -> Self {
		let credentials = Arc::new(config.credentials());

		Self {
			config: Arc::new(config),
			credentials,
			transport: transport.into(),
			sanitizer: sanitizer.into(),
		}
	}

	/// Returns a client signing with `credentials` that shares this client's transport.
	pub fn with_credentials(&self, credentials: Credentials) -> Self {
		Self { credentials: Arc::new(credentials), ..self.clone() }
	}

	/// Resolves a legacy call without sending it.
	pub fn resolve(&self, method: LegacyMethod, args: &Args) -> Result<RequestSpec> {
		method.resolve(args, &self.config.endpoints, &*self.sanitizer)
	}

	/// Invokes a legacy method with named arguments.
	pub async fn call(&self, method: LegacyMethod, args: &Args) -> Result<Reply> {
		let name = method.as_str();
		let span = CallSpan::new(name, &method.route_spec().verb);

		obs::record_call_outcome(name, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let spec = self.resolve(method, args)?;

				self.dispatch(spec).await
			})
			.await;

		record_result(name, &result);

		result
	}

	/// Invokes a legacy method by identifier.
	///
	/// `images_upload` is routed to [`Client::images_upload`]; any other identifier must be one of
	/// [`LegacyMethod::ALL`].
	pub async fn call_named(&self, name: &str, args: &Args) -> Result<Reply> {
		if name == IMAGES_UPLOAD {
			let upload = Upload::from_args(args)?;

			return self.images_upload(&upload).await;
		}

		self.call(name.parse()?, args).await
	}

	/// Signs and sends a resolved request, following redirects and decoding the final response.
	pub async fn dispatch(&self, spec: RequestSpec) -> Result<Reply> {
		let body = spec.payload.as_ref().map(|p| p.encode(&self.config.content_type)).unwrap_or_default();
		let response = self
			.send_signed(spec.url.clone(), |url| self.prepare_call(&spec, url, &body))
			.await?;

		self.decode(response)
	}
}
impl<T, S> Clone for Client<T, S>
where
	T: ?Sized + Transport,
	S: ?Sized + Sanitizer,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			credentials: self.credentials.clone(),
			transport: self.transport.clone(),
			sanitizer: self.sanitizer.clone(),
		}
	}
}
impl<T, S> Debug for Client<T, S>
where
	T: ?Sized + Transport,
	S: ?Sized + Sanitizer,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("config", &self.config)
			.field("credentials", &self.credentials)
			.finish_non_exhaustive()
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestTransport, TagStripper> {
	/// Creates a client backed by a fresh reqwest transport (redirects disabled) and the stock
	/// tag-stripping sanitizer.
	pub fn new(config: ClientConfig) -> Result<Self> {
		config.validate()?;

		Ok(Self::with_transport(config, ReqwestTransport::new()?, TagStripper))
	}
}

fn record_result<T>(name: &'static str, result: &Result<T>) {
	match result {
		Ok(_) => obs::record_call_outcome(name, CallOutcome::Success),
		Err(e) => obs::record_call_outcome(name, CallOutcome::Failure(e.kind())),
	}
}
