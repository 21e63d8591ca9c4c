//! Demonstrates legacy calls against a local mock service with the default reqwest transport,
//! including a redirect that is re-signed before it is followed.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use smugmug_compat::{
	client::Client,
	config::ClientConfig,
	router::{Args, LegacyMethod},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let moved = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v2/album/abc123");
			then.status(301).header("location", "/api/v2/album/abc123-renamed");
		})
		.await;
	let album = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v2/album/abc123-renamed");
			then.status(200).header("content-type", "application/json; charset=utf-8").body(
				r#"{"Response":{"Album":{"AlbumKey":"abc123-renamed","Name":"Holidays"}},"Code":200,"Message":"Ok"}"#,
			);
		})
		.await;
	let settings = server
		.mock_async(|when, then| {
			when.method(PATCH).path("/api/v2/album/abc123-renamed");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"Code":200,"Message":"Ok"}"#);
		})
		.await;
	let config = ClientConfig::builder("demo-consumer-key", "demo-consumer-secret")
		.token("demo-token", "demo-token-secret")
		.app_name("legacy-call-demo")
		.api_base(server.base_url())
		.build()?;
	let client = Client::new(config)?;
	let reply = client
		.call_named("albums_getInfo", &Args::new().with("AlbumKey", "abc123"))
		.await?;

	println!("Album after one redirect: {}.", reply.into_text());

	client
		.call(
			LegacyMethod::AlbumsChangeSettings,
			&Args::new()
				.with("AlbumKey", "abc123-renamed")
				.with("AlbumData", [("Name", "Summer Holidays")]),
		)
		.await?;

	println!("Album settings updated.");

	match client.call_named("albums_reorder", &Args::new()).await {
		Ok(_) => println!("Unknown identifier unexpectedly succeeded."),
		Err(e) => println!("Rejected locally ({}): {e}.", e.kind()),
	}

	moved.assert_async().await;
	album.assert_async().await;
	settings.assert_async().await;

	Ok(())
}
