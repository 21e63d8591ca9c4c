// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use rand::{Rng, distr::Alphanumeric};
use sha1::Sha1;
use time::OffsetDateTime;
// self
use crate::{
	_prelude::*,
	auth::{Credentials, SignatureMethod},
	error::ConfigError,
	http::Method,
	oauth::{percent_encode, sort_pairs_naturally},
	router::OAuthExtras,
};

type HmacSha1 = Hmac<Sha1>;

const NONCE_LEN: usize = 32;

/// OAuth protocol parameters for a single request.
///
/// Built fresh for every hop: the nonce is random and the timestamp is read from the clock at
/// construction time, which the dispatcher does immediately before sending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthParams {
	/// `oauth_version`.
	pub version: String,
	/// `oauth_nonce`.
	pub nonce: String,
	/// `oauth_timestamp`, seconds since the Unix epoch.
	pub timestamp: i64,
	/// `oauth_consumer_key`.
	pub consumer_key: String,
	/// `oauth_signature_method`.
	pub signature_method: SignatureMethod,
	/// `oauth_token`; absent only for the request-token step.
	pub token: Option<String>,
	/// `oauth_callback`; present only for the request-token step.
	pub callback: Option<String>,
	/// `oauth_verifier`, when exchanging a verified request token.
	pub verifier: Option<String>,
	/// `oauth_signature`, set by [`OAuthParams::sign`].
	pub signature: Option<String>,
}
impl OAuthParams {
	/// Builds the base parameter set with a fresh nonce and the current timestamp.
	///
	/// `token_required` is false only for the request-token step, which carries `oauth_callback`
	/// instead of `oauth_token`.
	pub fn fresh(
		credentials: &Credentials,
		token_required: bool,
		extras: &OAuthExtras,
	) -> Result<Self, ConfigError> {
		let token = if token_required { Some(credentials.require_token()?.to_owned()) } else { None };
		let callback = if token_required { None } else { extras.callback.clone() };

		Ok(Self {
			version: credentials.oauth_version.clone(),
			nonce: random_nonce(),
			timestamp: OffsetDateTime::now_utc().unix_timestamp(),
			consumer_key: credentials.consumer_key.clone(),
			signature_method: credentials.signature_method,
			token,
			callback,
			verifier: extras.verifier.clone(),
			signature: None,
		})
	}

	/// Pins the nonce (deterministic signing in tests and replays).
	pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
		self.nonce = nonce.into();

		self
	}

	/// Pins the timestamp.
	pub fn with_timestamp(mut self, timestamp: i64) -> Self {
		self.timestamp = timestamp;

		self
	}

	/// Protocol parameters in header order, excluding the signature.
	pub fn protocol_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = vec![
			("oauth_version", self.version.clone()),
			("oauth_nonce", self.nonce.clone()),
			("oauth_timestamp", self.timestamp.to_string()),
			("oauth_consumer_key", self.consumer_key.clone()),
			("oauth_signature_method", self.signature_method.as_str().to_owned()),
		];

		if let Some(token) = &self.token {
			pairs.push(("oauth_token", token.clone()));
		}
		if let Some(callback) = &self.callback {
			pairs.push(("oauth_callback", callback.clone()));
		}
		if let Some(verifier) = &self.verifier {
			pairs.push(("oauth_verifier", verifier.clone()));
		}

		pairs
	}

	/// Computes `oauth_signature` over the request.
	///
	/// `body_params` are the form-encoded body parameters; JSON, raw, and upload bodies pass an
	/// empty slice. Query parameters of `url` are always signed.
	pub fn sign(
		mut self,
		credentials: &Credentials,
		method: &Method,
		url: &Url,
		body_params: &[(String, String)],
	) -> Result<Self, ConfigError> {
		let key = credentials.signing_key(self.token.is_some())?;
		let params = self
			.protocol_pairs()
			.into_iter()
			.map(|(k, v)| (k.to_owned(), v))
			.chain(body_params.iter().cloned())
			.collect::<Vec<_>>();
		let base = signature_base_string(method, url, &params);

		self.signature = Some(compute_signature(self.signature_method, &key, &base)?);

		Ok(self)
	}

	/// Renders the `Authorization` header value.
	pub fn authorization_header(&self) -> String {
		let mut fields = self
			.protocol_pairs()
			.into_iter()
			.map(|(k, v)| format!("{k}=\"{}\"", percent_encode(&v)))
			.collect::<Vec<_>>();

		if let Some(signature) = &self.signature {
			fields.push(format!("oauth_signature=\"{}\"", percent_encode(signature)));
		}

		format!("OAuth {}", fields.join(", "))
	}
}

/// Builds the signing key `enc(consumer_secret)&enc(token_secret)`.
pub fn signing_key(consumer_secret: &str, token_secret: &str) -> String {
	format!("{}&{}", percent_encode(consumer_secret), percent_encode(token_secret))
}

/// Builds `VERB&enc(endpoint)&enc(normalized parameters)`.
///
/// The endpoint excludes query and fragment; query pairs join `params` before normalization.
pub fn signature_base_string(method: &Method, url: &Url, params: &[(String, String)]) -> String {
	let mut endpoint = url.clone();

	endpoint.set_query(None);
	endpoint.set_fragment(None);

	let mut encoded = url
		.query_pairs()
		.map(|(k, v)| (k.into_owned(), v.into_owned()))
		.chain(params.iter().cloned())
		.map(|(k, v)| (percent_encode(&k), percent_encode(&v)))
		.collect::<Vec<_>>();

	sort_pairs_naturally(&mut encoded);

	let normalized = encoded.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&");

	format!(
		"{}&{}&{}",
		method.as_str().to_ascii_uppercase(),
		percent_encode(endpoint.as_str()),
		percent_encode(&normalized)
	)
}

/// Signs `base` with `key` using `method`.
pub fn compute_signature(
	method: SignatureMethod,
	key: &str,
	base: &str,
) -> Result<String, ConfigError> {
	match method {
		SignatureMethod::HmacSha1 => {
			let mut mac = HmacSha1::new_from_slice(key.as_bytes())
				.map_err(|_| ConfigError::InvalidSigningKey)?;

			mac.update(base.as_bytes());

			Ok(STANDARD.encode(mac.finalize().into_bytes()))
		},
		SignatureMethod::PlainText => Ok(key.to_owned()),
	}
}

fn random_nonce() -> String {
	rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
}
