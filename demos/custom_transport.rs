//! Demonstrates plugging a non-reqwest HTTP stack into the client.
//!
//! 1. Implement [`Transport`] so it sends one request and surfaces `3xx` responses untouched.
//! 2. Hand the transport (and a sanitizer) to [`Client::with_transport`].
//! 3. Observe that every redirect hop arrives with a fresh signature.

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::{Arc, Mutex},
};
// crates.io
use color_eyre::Result;
// self
use smugmug_compat::{
	client::Client,
	config::ClientConfig,
	http::{HeaderValue, HttpRequest, HttpResponse, StatusCode, Transport, TransportFuture, header},
	router::{Args, LegacyMethod},
	sanitize::TagStripper,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ClientConfig::builder("demo-consumer-key", "demo-consumer-secret")
		.token("demo-token", "demo-token-secret")
		.api_base("https://api.example.com")
		.build()?;
	let transport = Arc::new(CannedTransport::default());
	let client: Client<CannedTransport> =
		Client::with_transport(config, Arc::clone(&transport), TagStripper);
	let reply =
		client.call(LegacyMethod::ImagesGetInfo, &Args::new().with("ImageKey", "moved")).await?;

	println!("Reply from the canned transport: {}.", reply.into_text());

	for (hop, (url, authorization)) in transport.seen().into_iter().enumerate() {
		println!("Hop {hop}: {url}\n    {authorization}");
	}

	let offline: Client<CannedTransport> = Client::with_transport(
		client.config.as_ref().clone(),
		CannedTransport { offline: true, ..Default::default() },
		TagStripper,
	);

	match offline.call(LegacyMethod::ImagesGetInfo, &Args::new().with("ImageKey", "k")).await {
		Ok(_) => println!("Offline transport unexpectedly succeeded."),
		Err(e) => println!("Transport failure surfaced as {}: {e}.", e.kind()),
	}

	Ok(())
}

#[derive(Debug)]
struct OfflineError;
impl Display for OfflineError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "network is unreachable")
	}
}
impl StdError for OfflineError {}

// Answers `/moved` with a redirect and everything else with a small JSON document.
#[derive(Default)]
struct CannedTransport {
	offline: bool,
	seen: Mutex<Vec<(String, String)>>,
}
impl CannedTransport {
	fn seen(&self) -> Vec<(String, String)> {
		self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
	}
}
impl Transport for CannedTransport {
	type Error = OfflineError;

	fn send(&self, request: HttpRequest) -> TransportFuture<'_, Self::Error> {
		Box::pin(async move {
			if self.offline {
				return Err(OfflineError);
			}
			if let Ok(mut seen) = self.seen.lock() {
				seen.push((
					request.url.to_string(),
					request.header_str("authorization").unwrap_or_default().to_owned(),
				));
			}

			let mut response = if request.url.path().ends_with("/moved") {
				let mut response = HttpResponse::new(StatusCode::FOUND);

				response.headers.insert(header::LOCATION, HeaderValue::from_static("/api/v2/image/current"));

				response
			} else {
				let mut response = HttpResponse::new(StatusCode::OK);

				response.body = br#"{"Response":{"Image":{"ImageKey":"current"}},"Code":200}"#.to_vec();

				response
			};

			response
				.headers
				.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

			Ok(response)
		})
	}
}
