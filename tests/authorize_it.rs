#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use smugmug_compat::{
	auth::Credentials,
	client::{Access, Client, Permissions},
	config::ClientConfig,
	error::{ConfigError, Error},
};

fn consumer_config(server: &MockServer) -> ClientConfig {
	ClientConfig::builder("consumer-key", "consumer-secret")
		.oauth_callback("https://app.example.com/cb")
		.api_base(server.base_url())
		.build()
		.expect("Test config should be valid.")
}

#[tokio::test]
async fn three_legged_flow_issues_access_token() {
	let server = MockServer::start_async().await;
	let request_token = server
		.mock_async(|when, then| {
			when.method(GET).path("/services/oauth/1.0a/getRequestToken").header_exists("authorization");
			then.status(200)
				.header("content-type", "text/plain")
				.body("oauth_token=req-token&oauth_token_secret=req-secret&oauth_callback_confirmed=true");
		})
		.await;
	let access_token = server
		.mock_async(|when, then| {
			when.method(GET).path("/services/oauth/1.0a/getAccessToken").header_exists("authorization");
			then.status(200)
				.header("content-type", "text/plain")
				.body("oauth_token=access-token&oauth_token_secret=access-secret");
		})
		.await;
	let client = Client::new(consumer_config(&server)).expect("Client should build.");
	let issued = client.fetch_request_token(None).await.expect("Request token should be issued.");

	assert_eq!(issued.oauth_token, "req-token");
	assert_eq!(issued.remain.get("oauth_callback_confirmed").map(String::as_str), Some("true"));

	let authorize = client
		.authorize_url(Access::Full, Permissions::Add, Some(&issued.oauth_token))
		.expect("Authorize URL should build.");

	assert_eq!(
		authorize.as_str(),
		format!(
			"{}/services/oauth/1.0a/authorize?Access=Full&Permissions=Add&oauth_token=req-token",
			server.base_url()
		)
	);

	let pending = client
		.with_credentials(client.credentials.with_token(issued.oauth_token, issued.oauth_token_secret));
	let access = pending.fetch_access_token("123456").await.expect("Access token should be issued.");
	let authorized: Credentials =
		pending.credentials.with_token(access.oauth_token, access.oauth_token_secret);

	assert_eq!(authorized.token.as_deref(), Some("access-token"));
	assert_eq!(authorized.token_secret.as_ref().map(|secret| secret.expose()), Some("access-secret"));

	request_token.assert_calls_async(1).await;
	access_token.assert_calls_async(1).await;
}

#[tokio::test]
async fn access_step_without_request_token_is_rejected() {
	let server = MockServer::start_async().await;
	let client = Client::new(consumer_config(&server)).expect("Client should build.");
	let err = client.fetch_access_token("123456").await.expect_err("A token should be required.");

	assert!(matches!(err, Error::Config(ConfigError::MissingToken)));
}

#[tokio::test]
async fn token_response_without_token_is_rejected() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/services/oauth/1.0a/getRequestToken");
			then.status(200).header("content-type", "text/plain").body("oauth_problem=nonce_used");
		})
		.await;

	let client = Client::new(consumer_config(&server)).expect("Client should build.");
	let err = client.fetch_request_token(None).await.expect_err("Incomplete response should fail.");

	assert!(matches!(err, Error::Config(ConfigError::TokenResponseMissing { key: "oauth_token" })));
}
