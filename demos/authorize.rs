//! Demonstrates the three-legged token exchange: fetch a request token, build the authorize URL
//! the user would visit, then trade the verifier for an access token.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use smugmug_compat::{
	client::{Access, Client, Permissions},
	config::ClientConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/services/oauth/1.0a/getRequestToken");
			then.status(200)
				.header("content-type", "text/plain")
				.body("oauth_token=demo-request&oauth_token_secret=demo-request-secret&oauth_callback_confirmed=true");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/services/oauth/1.0a/getAccessToken");
			then.status(200)
				.header("content-type", "text/plain")
				.body("oauth_token=demo-access&oauth_token_secret=demo-access-secret");
		})
		.await;

	let config = ClientConfig::builder("demo-consumer-key", "demo-consumer-secret")
		.app_name("authorize-demo")
		.api_base(server.base_url())
		.build()?;
	let client = Client::new(config)?;
	let request = client.fetch_request_token(None).await?;
	let authorize =
		client.authorize_url(Access::Full, Permissions::Modify, Some(&request.oauth_token))?;

	println!("Send the user to {authorize}.");

	let pending = client
		.with_credentials(client.credentials.with_token(request.oauth_token, request.oauth_token_secret));
	let access = pending.fetch_access_token("000000").await?;

	println!("Access token issued: {} (secret {}).", access.oauth_token, access.oauth_token_secret);

	Ok(())
}
