// crates.io
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, http::Method};

/// Extra OAuth protocol parameters carried by the token-exchange steps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OAuthExtras {
	/// `oauth_callback`, only sent on the request-token step.
	pub callback: Option<String>,
	/// `oauth_verifier`, sent when exchanging a verified request token.
	pub verifier: Option<String>,
}

/// Request body of a routed call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
	/// Key/value pairs; signed and serialized according to the content type.
	Params(Vec<(String, String)>),
	/// Opaque body sent verbatim and left out of the signature.
	Raw(String),
}
impl Payload {
	/// Body parameters that participate in the OAuth signature.
	///
	/// Only form-encoded pairs are signed; JSON and raw bodies leave the signature untouched.
	pub fn signable(&self, content_type: &str) -> &[(String, String)] {
		match self {
			Payload::Params(pairs) if !is_json_media_type(content_type) => pairs,
			Payload::Params(_) | Payload::Raw(_) => &[],
		}
	}

	/// Serializes the payload for the given content type.
	///
	/// Pairs become a JSON object for JSON content types and a form-urlencoded string otherwise.
	pub fn encode(&self, content_type: &str) -> Vec<u8> {
		match self {
			Payload::Raw(body) => body.clone().into_bytes(),
			Payload::Params(pairs) if is_json_media_type(content_type) => {
				let object = pairs
					.iter()
					.map(|(k, v)| (k.clone(), Value::String(v.clone())))
					.collect::<Map<_, _>>();

				Value::Object(object).to_string().into_bytes()
			},
			Payload::Params(pairs) => url::form_urlencoded::Serializer::new(String::new())
				.extend_pairs(pairs)
				.finish()
				.into_bytes(),
		}
	}
}

/// Fully resolved request for one legacy call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestSpec {
	/// Legacy identifier the spec was resolved from (`images_upload` for uploads).
	pub name: &'static str,
	/// HTTP verb.
	pub verb: Method,
	/// Absolute endpoint URL.
	pub url: Url,
	/// Optional request body.
	pub payload: Option<Payload>,
	/// False only for the request-token step.
	pub requires_token: bool,
	/// Callback and verifier for the token-exchange steps.
	pub extras: OAuthExtras,
}

/// Whether `content_type` names a JSON media type (`application/json` or a `+json` suffix).
pub fn is_json_media_type(content_type: &str) -> bool {
	let primary = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();

	primary == "application/json" || primary.ends_with("+json")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn params() -> Payload {
		Payload::Params(vec![("Title".into(), "Summer & Sun".into()), ("Hidden".into(), "true".into())])
	}

	#[test]
	fn params_encode_as_json_object_for_json_types() {
		let body = params().encode("application/json; charset=utf-8");
		let value = serde_json::from_slice::<Value>(&body).expect("Body should be JSON.");

		assert_eq!(value["Title"], "Summer & Sun");
		assert_eq!(value["Hidden"], "true");
	}

	#[test]
	fn params_encode_as_form_otherwise() {
		let body = params().encode("application/x-www-form-urlencoded");

		assert_eq!(String::from_utf8(body).expect("Form should be UTF-8."), "Title=Summer+%26+Sun&Hidden=true");
	}

	#[test]
	fn raw_bodies_are_verbatim_and_unsigned() {
		let raw = Payload::Raw("{\"Title\":\"x\"}".into());

		assert_eq!(raw.encode("application/json"), b"{\"Title\":\"x\"}".to_vec());
		assert!(raw.signable("application/x-www-form-urlencoded").is_empty());
	}

	#[test]
	fn only_form_encoded_pairs_are_signable() {
		assert!(params().signable("application/json").is_empty());
		assert!(params().signable("application/vnd.api+json; charset=utf-8").is_empty());
		assert_eq!(params().signable("application/x-www-form-urlencoded").len(), 2);
	}

	#[test]
	fn json_media_type_detection() {
		assert!(is_json_media_type("Application/JSON"));
		assert!(is_json_media_type("application/vnd.api+json"));
		assert!(!is_json_media_type("text/html; charset=utf-8"));
	}
}
