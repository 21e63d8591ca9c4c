//! Client-level error types shared by routing, signing, dispatch, and upload.

// std
use std::path::PathBuf;
// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Every variant aborts the in-flight call at the point of detection. Nothing is retried
/// automatically apart from the bounded redirect loop.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem (missing secret or token, bad endpoint).
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Network-level failure reported by the transport.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The legacy method identifier is not part of the compatibility surface.
	#[error("Method `{method}` is not supported.")]
	UnsupportedMethod {
		/// Identifier supplied by the caller.
		method: String,
	},
	/// One or more required named arguments were not supplied.
	#[error("Method `{method}` is missing required argument(s): {}.", keys.join(", "))]
	MissingArgument {
		/// Legacy method being invoked.
		method: &'static str,
		/// Names of every missing argument.
		keys: Vec<&'static str>,
	},
	/// A named argument was supplied with the wrong shape.
	#[error("Argument `{key}` of method `{method}` is invalid: {reason}.")]
	InvalidArgument {
		/// Legacy method being invoked.
		method: &'static str,
		/// Offending argument name.
		key: &'static str,
		/// Human readable explanation.
		reason: &'static str,
	},
	/// The sanitizer rejected a caller-supplied value.
	#[error("Argument `{key}` was rejected by the sanitizer: {reason}.")]
	UnsafeInput {
		/// Offending argument name.
		key: String,
		/// Reason reported by the sanitizer.
		reason: String,
	},
	/// The local file to upload could not be read.
	#[error("Unable to read upload file `{}`.", path.display())]
	Io {
		/// Path that failed to open or read.
		path: PathBuf,
		/// Underlying I/O failure.
		#[source]
		source: std::io::Error,
	},
	/// The service answered with a failure status or an embedded failure payload.
	#[error("Remote call failed with status {status}: {message}.")]
	Remote {
		/// HTTP status code of the final response.
		status: u16,
		/// Error code embedded in the JSON body, when present.
		code: Option<i64>,
		/// Message embedded in the JSON body, or the canonical status reason.
		message: String,
		/// Raw response body.
		body: String,
	},
	/// The service kept redirecting past the configured bound.
	#[error("Gave up after {limit} redirect(s); last location was `{last_location}`.")]
	TooManyRedirects {
		/// Maximum number of redirect hops allowed.
		limit: u8,
		/// Location the service asked for after the bound was exhausted.
		last_location: String,
	},
	/// The response was declared JSON but could not be parsed.
	#[error("Response with status {status} declared JSON but could not be parsed.")]
	Decode {
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_json::Error,
	},
}
impl Error {
	/// Stable classification of the error for callers that branch on outcome kinds.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::Config(_) => ErrorKind::Configuration,
			Error::Transport(_) => ErrorKind::Transport,
			Error::UnsupportedMethod { .. } => ErrorKind::UnsupportedMethod,
			Error::MissingArgument { .. } => ErrorKind::MissingArgument,
			Error::InvalidArgument { .. } | Error::UnsafeInput { .. } => ErrorKind::InvalidInput,
			Error::Io { .. } => ErrorKind::Io,
			Error::Remote { .. } | Error::Decode { .. } => ErrorKind::Remote,
			Error::TooManyRedirects { .. } => ErrorKind::TooManyRedirects,
		}
	}

	/// Optional numeric code attached to the error.
	///
	/// Remote failures prefer the code embedded in the body over the HTTP status.
	pub fn code(&self) -> Option<i64> {
		match self {
			Error::Remote { status, code, .. } => code.or(Some(i64::from(*status))),
			Error::Decode { status, .. } => Some(i64::from(*status)),
			_ => None,
		}
	}
}

/// Coarse error categories mirrored from [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Unknown legacy method identifier.
	UnsupportedMethod,
	/// Required argument absent.
	MissingArgument,
	/// Argument present but malformed or unsafe.
	InvalidInput,
	/// Missing or invalid secret, token, or endpoint.
	Configuration,
	/// Local file could not be read.
	Io,
	/// Network-level failure.
	Transport,
	/// Failure reported by the service.
	Remote,
	/// Redirect bound exceeded.
	TooManyRedirects,
}
impl ErrorKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::UnsupportedMethod => "unsupported_method",
			ErrorKind::MissingArgument => "missing_argument",
			ErrorKind::InvalidInput => "invalid_input",
			ErrorKind::Configuration => "configuration",
			ErrorKind::Io => "io",
			ErrorKind::Transport => "transport",
			ErrorKind::Remote => "remote",
			ErrorKind::TooManyRedirects => "too_many_redirects",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and credential failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// An endpoint base URL cannot be parsed.
	#[error("The {endpoint} endpoint `{value}` is not a valid URL.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Raw value supplied by the caller.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// An endpoint base URL uses a scheme other than `http`/`https`.
	#[error("The {endpoint} endpoint `{value}` must use http or https.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Raw value supplied by the caller.
		value: String,
	},
	/// The consumer key is empty.
	#[error("Consumer key must not be empty.")]
	MissingConsumerKey,
	/// The consumer secret is absent.
	#[error("Consumer secret is not set.")]
	MissingConsumerSecret,
	/// A token-bearing call was attempted without an access token.
	#[error("Access token is not set; only the request-token step may be signed without it.")]
	MissingToken,
	/// A token-bearing call was attempted without a token secret.
	#[error("Access token secret is not set.")]
	MissingTokenSecret,
	/// The configured content type is empty.
	#[error("Content type must not be empty.")]
	EmptyContentType,
	/// The redirect bound must allow at least one hop.
	#[error("max_redirects must be at least 1.")]
	ZeroRedirects,
	/// Unknown signature method name.
	#[error("Signature method `{0}` is not supported.")]
	UnsupportedSignatureMethod(String),
	/// The MAC implementation refused the signing key.
	#[error("Signing key was rejected by the MAC implementation.")]
	InvalidSigningKey,
	/// A computed header value contains bytes that HTTP headers cannot carry.
	#[error("Header `{name}` cannot carry the computed value.")]
	InvalidHeader {
		/// Header name.
		name: String,
	},
	/// Token exchange response did not contain the expected key.
	#[error("Token response is missing `{key}`.")]
	TokenResponseMissing {
		/// Key that was not found.
		key: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling `{url}`.")]
	Network {
		/// Target URL of the failed hop.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(url: &Url, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { url: url.to_string(), source: Box::new(src) }
	}
}
