//! Legacy-method compatibility client for the SmugMug v2 REST API.
//!
//! Callers keep speaking the flat 1.3-era vocabulary (`albums_getInfo`, `images_get`, ...) with
//! named arguments; the crate resolves each call to a verb, endpoint, and payload, signs it with
//! OAuth 1.0a, follows redirects (re-signing every hop), and decodes the response.
//!
//! The HTTP stack and input sanitization are injected through the [`http::Transport`] and
//! [`sanitize::Sanitizer`] capabilities. A reqwest-backed transport ships behind the default
//! `reqwest` feature.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod router;
pub mod sanitize;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use std::sync::Mutex;

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Credentials,
		client::Client,
		config::ClientConfig,
		http::{
			HeaderName, HeaderValue, HttpRequest, HttpResponse, StatusCode, Transport, TransportFuture,
		},
		oauth::OAuthParams,
		router::OAuthExtras,
		sanitize::{Sanitizer, TagStripper},
	};

	/// Consumer key shared by test fixtures.
	pub const TEST_CONSUMER_KEY: &str = "test-consumer-key";
	/// Consumer secret shared by test fixtures.
	pub const TEST_CONSUMER_SECRET: &str = "test-consumer-secret";
	/// Access token shared by test fixtures.
	pub const TEST_TOKEN: &str = "test-token";
	/// Access token secret shared by test fixtures.
	pub const TEST_TOKEN_SECRET: &str = "test-token-secret";

	/// Error emitted by [`ScriptedTransport`] once its script is exhausted or when asked to fail.
	#[derive(Debug, ThisError)]
	pub enum ScriptedTransportError {
		/// Every scripted response has already been consumed.
		#[error("Scripted transport has no responses left.")]
		Exhausted,
		/// The script asked for a connection-level failure.
		#[error("Scripted connection failure: {0}.")]
		Connection(String),
	}

	/// One scripted transport outcome.
	#[derive(Clone, Debug)]
	pub enum ScriptedReply {
		/// Respond with the given response.
		Respond(HttpResponse),
		/// Fail at the connection level.
		Fail(String),
	}

	/// In-memory [`Transport`] that replays scripted responses and records every request.
	#[derive(Clone, Debug, Default)]
	pub struct ScriptedTransport {
		script: Arc<Mutex<Vec<ScriptedReply>>>,
		requests: Arc<Mutex<Vec<HttpRequest>>>,
	}
	impl ScriptedTransport {
		/// Creates a transport that replays `replies` in order.
		pub fn new(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
			let mut script = replies.into_iter().collect::<Vec<_>>();

			script.reverse();

			Self { script: Arc::new(Mutex::new(script)), requests: Default::default() }
		}

		/// Returns a snapshot of every request seen so far.
		pub fn requests(&self) -> Vec<HttpRequest> {
			self.requests.lock().map(|guard| guard.clone()).unwrap_or_default()
		}

		/// Number of requests seen so far.
		pub fn calls(&self) -> usize {
			self.requests.lock().map(|guard| guard.len()).unwrap_or_default()
		}
	}
	impl Transport for ScriptedTransport {
		type Error = ScriptedTransportError;

		fn send(&self, request: HttpRequest) -> TransportFuture<'_, Self::Error> {
			Box::pin(async move {
				if let Ok(mut seen) = self.requests.lock() {
					seen.push(request);
				}

				let next = self.script.lock().ok().and_then(|mut script| script.pop());

				match next {
					Some(ScriptedReply::Respond(response)) => Ok(response),
					Some(ScriptedReply::Fail(reason)) =>
						Err(ScriptedTransportError::Connection(reason)),
					None => Err(ScriptedTransportError::Exhausted),
				}
			})
		}
	}

	/// Builds a response with the given status, headers, and body.
	pub fn response(status: u16, headers: &[(&str, &str)], body: &str) -> HttpResponse {
		let status = StatusCode::from_u16(status).expect("Scripted status should be valid.");
		let mut response = HttpResponse::new(status);

		for (name, value) in headers {
			response.headers.append(
				HeaderName::from_bytes(name.as_bytes()).expect("Scripted header name should be valid."),
				HeaderValue::from_str(value).expect("Scripted header value should be valid."),
			);
		}

		response.body = body.as_bytes().to_vec();

		response
	}

	/// Builds a `200 application/json` response.
	pub fn json_response(body: &str) -> HttpResponse {
		response(200, &[("content-type", "application/json; charset=utf-8")], body)
	}

	/// Builds a redirect response pointing at `location`.
	pub fn redirect_response(status: u16, location: &str) -> HttpResponse {
		response(status, &[("location", location)], "")
	}

	/// Configuration pointing every endpoint at `api_base`, with full test credentials.
	pub fn test_config(api_base: &str) -> ClientConfig {
		ClientConfig::builder(TEST_CONSUMER_KEY, TEST_CONSUMER_SECRET)
			.token(TEST_TOKEN, TEST_TOKEN_SECRET)
			.api_base(api_base)
			.upload_base(&format!("{}/upload", api_base.trim_end_matches('/')))
			.app_name("compat-tests")
			.build()
			.expect("Test configuration should be valid.")
	}

	/// Returns a field of an `OAuth ...` authorization header, still percent-encoded.
	pub fn authorization_field<'a>(header: &'a str, key: &str) -> Option<&'a str> {
		header.strip_prefix("OAuth ")?.split(", ").find_map(|field| {
			let (name, value) = field.split_once('=')?;

			(name == key).then(|| value.trim_matches('"'))
		})
	}

	/// Recomputes the `Authorization` header of a recorded token-bearing request, reusing its nonce
	/// and timestamp and signing `body_params` on top of the protocol and query parameters.
	pub fn resign<T, S>(
		client: &Client<T, S>,
		request: &HttpRequest,
		body_params: &[(String, String)],
	) -> String
	where
		T: ?Sized + Transport,
		S: ?Sized + Sanitizer,
	{
		let sent = request.header_str("authorization").expect("Authorization header should be present.");
		let nonce = authorization_field(sent, "oauth_nonce").expect("Nonce should be present.");
		let timestamp = authorization_field(sent, "oauth_timestamp")
			.and_then(|value| value.parse().ok())
			.expect("Timestamp should be present.");

		OAuthParams::fresh(&client.credentials, true, &OAuthExtras::default())
			.expect("Credentials should be complete.")
			.with_nonce(nonce)
			.with_timestamp(timestamp)
			.sign(&client.credentials, &request.method, &request.url, body_params)
			.expect("Recorded request should sign.")
			.authorization_header()
	}

	/// Test credentials carrying a token pair.
	pub fn test_credentials() -> Credentials {
		Credentials::new(TEST_CONSUMER_KEY, TEST_CONSUMER_SECRET).with_token(TEST_TOKEN, TEST_TOKEN_SECRET)
	}

	/// Builds a client over a scripted transport, returning both handles.
	pub fn scripted_client(
		replies: impl IntoIterator<Item = ScriptedReply>,
	) -> (Client<ScriptedTransport, TagStripper>, ScriptedTransport) {
		let transport = ScriptedTransport::new(replies);
		let client = Client::with_transport(
			test_config("https://api.example.com"),
			transport.clone(),
			TagStripper,
		);

		(client, transport)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use ::http as http_types;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
