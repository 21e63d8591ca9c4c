//! Transport primitives for signed API calls.
//!
//! The dispatcher depends on a single capability, [`Transport`], which sends one fully-formed
//! [`HttpRequest`] and hands back the raw [`HttpResponse`]. Redirects are never followed by the
//! transport itself: every hop must be re-signed against its new URL, so implementations have to
//! surface `3xx` responses untouched. The embedding application picks the concrete transport; a
//! reqwest-backed [`ReqwestTransport`] ships behind the default `reqwest` feature.

// crates.io
pub use ::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header};
// self
use crate::_prelude::*;

/// Boxed future returned by [`Transport::send`].
pub type TransportFuture<'a, E> = Pin<Box<dyn Future<Output = Result<HttpResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP stacks able to deliver one signed request.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can back many client
/// instances. A call is the only suspension point of a dispatch; dropping the returned future
/// abandons the request and the dispatcher discards its redirect state with it.
pub trait Transport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted for connection-level failures.
	type Error: 'static + Send + Sync + StdError;

	/// Sends `request` exactly once, without following redirects.
	fn send(&self, request: HttpRequest) -> TransportFuture<'_, Self::Error>;
}
impl<T> Transport for Arc<T>
where
	T: ?Sized + Transport,
{
	type Error = T::Error;

	fn send(&self, request: HttpRequest) -> TransportFuture<'_, Self::Error> {
		(**self).send(request)
	}
}

/// Outbound request handed to a [`Transport`].
#[derive(Clone, Debug)]
pub struct HttpRequest {
	/// HTTP verb.
	pub method: Method,
	/// Absolute target URL.
	pub url: Url,
	/// Request headers, `Authorization` included.
	pub headers: HeaderMap,
	/// Raw request body (empty when the call carries no payload).
	pub body: Vec<u8>,
}
impl HttpRequest {
	/// Returns a header value as text, if present and valid UTF-8.
	pub fn header_str(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}
}

/// Response returned by a [`Transport`].
#[derive(Clone, Debug)]
pub struct HttpResponse {
	/// Status code.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Creates an empty response with the given status.
	pub fn new(status: StatusCode) -> Self {
		Self { status, headers: HeaderMap::new(), body: Vec::new() }
	}

	/// Returns a header value as text, if present and valid UTF-8.
	pub fn header_str(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}

	/// Primary token of the `Content-Type` header, without parameters such as `charset`.
	pub fn media_type(&self) -> Option<&str> {
		self.header_str(header::CONTENT_TYPE.as_str())
			.and_then(|value| value.split(';').next())
			.map(str::trim)
			.filter(|value| !value.is_empty())
	}

	/// Body decoded as UTF-8, replacing invalid sequences.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

/// Thin wrapper around [`ReqwestClient`] with redirect following disabled.
///
/// Any custom client passed to [`ReqwestTransport::with_client`] must also be built with
/// `redirect::Policy::none()`, otherwise reqwest would replay the stale signature on the next hop.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport whose client never follows redirects.
	pub fn new() -> Result<Self> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(crate::error::ConfigError::from)?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest client.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Transport for ReqwestTransport {
	type Error = ReqwestError;

	fn send(&self, request: HttpRequest) -> TransportFuture<'_, Self::Error> {
		let client = self.0.clone();

		Box::pin(async move {
			let HttpRequest { method, url, headers, body } = request;
			let response =
				client.request(method, url).headers(headers).body(body).send().await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await?.to_vec();

			Ok(HttpResponse { status, headers, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn media_type_strips_parameters() {
		let mut response = HttpResponse::new(StatusCode::OK);

		response.headers.insert(
			header::CONTENT_TYPE,
			HeaderValue::from_static("application/json; charset=utf-8"),
		);

		assert_eq!(response.media_type(), Some("application/json"));
	}

	#[test]
	fn media_type_absent_without_header() {
		let response = HttpResponse::new(StatusCode::NO_CONTENT);

		assert_eq!(response.media_type(), None);
	}
}
