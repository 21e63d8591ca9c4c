// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	client::{Client, Reply},
	error::{ConfigError, TransportError},
	http::{HeaderMap, HeaderName, HeaderValue, HttpRequest, HttpResponse, Method, Transport, header},
	oauth::OAuthParams,
	obs,
	router::{OAuthExtras, RequestSpec},
	sanitize::Sanitizer,
};

impl<T, S> Client<T, S>
where
	T: ?Sized + Transport,
	S: ?Sized + Sanitizer,
{
	/// Drives the `Signed → Sent → (Redirect → Signed)*` loop.
	///
	/// `prepare` builds (and signs) the request for the current target; it runs again for every
	/// hop so each redirect gets a fresh nonce, timestamp, and a signature over the new URL.
	pub(crate) async fn send_signed<F>(&self, mut url: Url, prepare: F) -> Result<HttpResponse>
	where
		F: Fn(&Url) -> Result<HttpRequest>,
	{
		let limit = self.config.max_redirects;
		let mut hops = 0_u8;

		loop {
			let request = prepare(&url)?;
			let verb = request.method.clone();
			let response = self
				.transport
				.send(request)
				.await
				.map_err(|e| TransportError::network(&url, e))?;

			match response.status.as_u16() / 100 {
				2 => return Ok(response),
				3 => {
					let next = redirect_target(&url, &response)?;

					if hops >= limit {
						return Err(Error::TooManyRedirects { limit, last_location: next.to_string() });
					}

					hops += 1;

					obs::record_redirect(hops, &verb, response.status, &next);

					url = next;
				},
				_ => return Err(status_error(&response)),
			}
		}
	}

	/// Builds the signed request of a routed call for one hop.
	pub(crate) fn prepare_call(
		&self,
		spec: &RequestSpec,
		url: &Url,
		body: &[u8],
	) -> Result<HttpRequest> {
		let signable = spec
			.payload
			.as_ref()
			.map(|p| p.signable(&self.config.content_type))
			.unwrap_or_default();
		let authorization =
			self.authorization(&spec.verb, url, spec.requires_token, &spec.extras, signable)?;
		let mut headers = HeaderMap::new();

		insert_header(&mut headers, header::HOST.as_str(), &host_header(url))?;
		insert_header(&mut headers, header::ACCEPT.as_str(), &self.config.content_type)?;
		insert_header(&mut headers, header::CONTENT_TYPE.as_str(), &self.config.content_type)?;
		insert_header(&mut headers, header::USER_AGENT.as_str(), &self.config.user_agent())?;
		insert_header(&mut headers, header::AUTHORIZATION.as_str(), &authorization)?;

		Ok(HttpRequest { method: spec.verb.clone(), url: url.clone(), headers, body: body.to_vec() })
	}

	/// Signs one hop and renders the `Authorization` header.
	pub(crate) fn authorization(
		&self,
		verb: &Method,
		url: &Url,
		requires_token: bool,
		extras: &OAuthExtras,
		body_params: &[(String, String)],
	) -> Result<String> {
		let params = OAuthParams::fresh(&self.credentials, requires_token, extras)?.sign(
			&self.credentials,
			verb,
			url,
			body_params,
		)?;

		Ok(params.authorization_header())
	}

	/// Decodes the final response according to its content type.
	pub(crate) fn decode(&self, response: HttpResponse) -> Result<Reply> {
		let json_type = primary_media_type(&self.config.content_type);
		let is_json =
			response.media_type().is_some_and(|media| media.eq_ignore_ascii_case(json_type));

		if !is_json {
			return Ok(Reply::Text(response.text()));
		}
		if response.body.iter().all(u8::is_ascii_whitespace) {
			return Ok(Reply::Json(Value::Null));
		}

		let status = response.status.as_u16();
		let value = serde_json::from_slice::<Value>(&response.body)
			.map_err(|source| Error::Decode { status, source })?;

		match embedded_failure(&value) {
			Some((code, message)) =>
				Err(Error::Remote { status, code, message, body: response.text() }),
			None => Ok(Reply::Json(value)),
		}
	}
}

pub(crate) fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<()> {
	let invalid = || ConfigError::InvalidHeader { name: name.to_owned() };
	let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
	let value = HeaderValue::from_bytes(value.as_bytes()).map_err(|_| invalid())?;

	headers.insert(name, value);

	Ok(())
}

pub(crate) fn host_header(url: &Url) -> String {
	let host = url.host_str().unwrap_or_default();

	match url.port() {
		Some(port) => format!("{host}:{port}"),
		None => host.to_owned(),
	}
}

fn primary_media_type(content_type: &str) -> &str {
	content_type.split(';').next().unwrap_or_default().trim()
}

fn redirect_target(current: &Url, response: &HttpResponse) -> Result<Url> {
	let location = response.header_str(header::LOCATION.as_str()).ok_or_else(|| Error::Remote {
		status: response.status.as_u16(),
		code: None,
		message: "redirect without a Location header".into(),
		body: response.text(),
	})?;

	current.join(location).map_err(|e| Error::Remote {
		status: response.status.as_u16(),
		code: None,
		message: format!("redirect to unusable location `{location}`: {e}"),
		body: response.text(),
	})
}

// Non-2xx/3xx responses; a JSON body may still carry the service's own code and message.
fn status_error(response: &HttpResponse) -> Error {
	let status = response.status.as_u16();
	let body = response.text();
	let embedded = serde_json::from_str::<Value>(&body).ok().map(|value| {
		let code = value.get("Code").or_else(|| value.get("code")).and_then(Value::as_i64);
		let message = value
			.get("Message")
			.or_else(|| value.get("message"))
			.and_then(Value::as_str)
			.map(str::to_owned);

		(code, message)
	});
	let (code, message) = embedded.unwrap_or_default();
	let message = message.unwrap_or_else(|| {
		response.status.canonical_reason().unwrap_or("unexpected status").to_owned()
	});

	Error::Remote { status, code, message, body }
}

// `stat: "fail"` (1.x envelope) or `Code >= 400` (v2 envelope).
fn embedded_failure(value: &Value) -> Option<(Option<i64>, String)> {
	if value.get("stat").and_then(Value::as_str) == Some("fail") {
		let code = value.get("code").and_then(Value::as_i64);
		let message = value.get("message").and_then(Value::as_str).unwrap_or("fail").to_owned();

		return Some((code, message));
	}

	match value.get("Code").and_then(Value::as_i64) {
		Some(code) if code >= 400 => {
			let message = value.get("Message").and_then(Value::as_str).unwrap_or_default().to_owned();

			Some((Some(code), message))
		},
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::*,
		router::{Args, LegacyMethod},
	};

	#[test]
	fn embedded_failure_detects_both_envelopes() {
		let legacy = serde_json::json!({"stat": "fail", "code": 5, "message": "system error"});
		let v2 = serde_json::json!({"Code": 404, "Message": "Not Found"});
		let ok = serde_json::json!({"Code": 200, "Message": "Ok", "stat": "ok"});

		assert_eq!(embedded_failure(&legacy), Some((Some(5), "system error".into())));
		assert_eq!(embedded_failure(&v2), Some((Some(404), "Not Found".into())));
		assert_eq!(embedded_failure(&ok), None);
	}

	#[test]
	fn host_header_keeps_explicit_port() {
		let url = Url::parse("http://127.0.0.1:8080/api").expect("URL should parse.");

		assert_eq!(host_header(&url), "127.0.0.1:8080");
	}

	#[test]
	fn decode_matches_content_type_case_insensitively() {
		let (client, _) = scripted_client([]);
		let reply = client
			.decode(response(200, &[("content-type", "Application/JSON; charset=UTF-8")], "[1,2]"))
			.expect("JSON body should decode.");

		assert_eq!(reply, Reply::Json(serde_json::json!([1, 2])));

		let reply = client
			.decode(response(200, &[("content-type", "text/html")], "<p>{}</p>"))
			.expect("Text body should pass through.");

		assert_eq!(reply, Reply::Text("<p>{}</p>".into()));
	}

	#[test]
	fn decode_reports_malformed_json() {
		let (client, _) = scripted_client([]);
		let err = client.decode(json_response("{not json")).expect_err("Malformed JSON should fail.");

		assert!(matches!(err, Error::Decode { status: 200, .. }));
	}

	#[test]
	fn prepare_call_resigns_each_hop() {
		let (client, _) = scripted_client([]);
		let spec = client
			.resolve(
				LegacyMethod::AlbumsChangeSettings,
				&Args::new().with("AlbumKey", "k").with("AlbumData", [("Title", "New")]),
			)
			.expect("Arguments should resolve.");
		let body = spec
			.payload
			.as_ref()
			.map(|p| p.encode(&client.config.content_type))
			.expect("Payload should exist.");
		let first = client.prepare_call(&spec, &spec.url, &body).expect("First hop should sign.");
		let second = client.prepare_call(&spec, &spec.url, &body).expect("Second hop should sign.");

		assert_eq!(first.method, Method::PATCH);
		assert_eq!(first.body, br#"{"Title":"New"}"#.to_vec());
		assert_eq!(first.header_str("content-type"), Some("application/json"));
		assert_ne!(first.header_str("authorization"), second.header_str("authorization"));
	}

	#[tokio::test]
	async fn each_redirect_hop_is_resigned() {
		let (client, transport) = scripted_client([
			ScriptedReply::Respond(redirect_response(307, "https://api.example.com/api/v2/image/k2")),
			ScriptedReply::Respond(json_response(r#"{"Code":200}"#)),
		]);

		client
			.call(LegacyMethod::ImagesGetInfo, &Args::new().with("ImageKey", "k1"))
			.await
			.expect("Redirected call should succeed.");

		let requests = transport.requests();

		assert_eq!(requests.len(), 2);
		assert_eq!(requests[1].url.as_str(), "https://api.example.com/api/v2/image/k2");
		assert_eq!(requests[1].header_str("host"), Some("api.example.com"));
		assert_ne!(requests[0].header_str("authorization"), requests[1].header_str("authorization"));
	}

	#[tokio::test]
	async fn redirect_limit_allows_one_request_more_than_hops() {
		let replies = (0..6).map(|i| {
			ScriptedReply::Respond(redirect_response(302, &format!("/api/v2/album/hop{i}")))
		});
		let (client, transport) = scripted_client(replies);
		let err = client
			.call(LegacyMethod::AlbumsGetInfo, &Args::new().with("AlbumKey", "start"))
			.await
			.expect_err("Sixth redirect should exceed the default limit.");

		assert_eq!(transport.calls(), 6);
		assert!(matches!(
			err,
			Error::TooManyRedirects { limit: 5, ref last_location }
				if last_location == "https://api.example.com/api/v2/album/hop5"
		));
	}

	#[tokio::test]
	async fn redirect_without_location_is_remote_error() {
		let (client, _) = scripted_client([ScriptedReply::Respond(response(302, &[], ""))]);
		let err = client
			.call(LegacyMethod::AlbumsGetInfo, &Args::new().with("AlbumKey", "k"))
			.await
			.expect_err("Redirect without Location should fail.");

		assert!(matches!(err, Error::Remote { status: 302, .. }));
	}

	#[tokio::test]
	async fn transport_failure_is_wrapped_with_target() {
		let (client, transport) = scripted_client([ScriptedReply::Fail("connection reset".into())]);
		let err = client
			.call(LegacyMethod::ImagesGet, &Args::new().with("AlbumKey", "a1"))
			.await
			.expect_err("Connection failure should surface.");

		assert_eq!(err.kind(), crate::error::ErrorKind::Transport);
		assert!(err.to_string().contains("https://api.example.com/api/v2/album/a1!images"));
		assert_eq!(transport.calls(), 1);
	}

	#[tokio::test]
	async fn empty_json_body_decodes_to_null() {
		let (client, _) = scripted_client([ScriptedReply::Respond(response(
			204,
			&[("content-type", "application/json")],
			"",
		))]);
		let reply = client
			.call(LegacyMethod::ImagesDelete, &Args::new().with("ImageKey", "k"))
			.await
			.expect("Empty body should decode.");

		assert_eq!(reply, Reply::Json(Value::Null));
	}

	#[tokio::test]
	async fn json_payload_stays_out_of_the_signature() {
		let (client, transport) = scripted_client([ScriptedReply::Respond(json_response("{}"))]);

		client
			.call(
				LegacyMethod::AlbumsChangeSettings,
				&Args::new().with("AlbumKey", "k").with("AlbumData", [("Title", "New")]),
			)
			.await
			.expect("Call should succeed.");

		let requests = transport.requests();
		let request = &requests[0];
		let body_pairs = vec![("Title".to_owned(), "New".to_owned())];

		assert_eq!(request.body, br#"{"Title":"New"}"#.to_vec());
		assert_eq!(request.header_str("authorization"), Some(resign(&client, request, &[]).as_str()));
		assert_ne!(
			request.header_str("authorization"),
			Some(resign(&client, request, &body_pairs).as_str())
		);
	}

	#[tokio::test]
	async fn form_payload_is_signed() {
		let (scripted, transport) = scripted_client([ScriptedReply::Respond(response(
			200,
			&[("content-type", "application/x-www-form-urlencoded")],
			"",
		))]);
		let mut config = scripted.config.as_ref().clone();

		config.content_type = "application/x-www-form-urlencoded".into();

		let client: Client<ScriptedTransport> =
			Client::with_transport(config, transport.clone(), crate::sanitize::TagStripper);

		client
			.call(
				LegacyMethod::AlbumsChangeSettings,
				&Args::new().with("AlbumKey", "k").with("AlbumData", [("Title", "New")]),
			)
			.await
			.expect("Call should succeed.");

		let requests = transport.requests();
		let request = &requests[0];
		let body_pairs = vec![("Title".to_owned(), "New".to_owned())];

		assert_eq!(request.body, b"Title=New".to_vec());
		assert_eq!(
			request.header_str("authorization"),
			Some(resign(&client, request, &body_pairs).as_str())
		);
	}
}
