//! Binary upload variant.
//!
//! Uploads go to `{uploadBase}/{encodedFileName}` as a `PUT` with the raw file bytes as the body.
//! Per-upload metadata travels in `X-Smug-*` headers, and the OAuth signature covers the protocol
//! parameters only.

// std
use std::path::{Path, PathBuf};
// crates.io
use md5::{Digest, Md5};
// self
use crate::{
	_prelude::*,
	client::{
		Client, IMAGES_UPLOAD, Reply,
		dispatch::{host_header, insert_header},
	},
	error::ConfigError,
	http::{HeaderMap, HeaderValue, HttpRequest, Method, Transport, header},
	oauth::percent_encode,
	obs::{self, CallOutcome, CallSpan},
	router::{ArgValue, Args, OAuthExtras, sanitize_value},
	sanitize::Sanitizer,
};

const DEFAULT_RESPONSE_TYPE: &str = "JSON";

/// One file upload and its metadata.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Upload {
	/// Local file to send.
	pub file: PathBuf,
	/// Target album identifier (`X-Smug-AlbumID`).
	pub album_id: String,
	/// File name override; defaults to the file name of [`Upload::file`].
	pub file_name: Option<String>,
	/// `X-Smug-ResponseType`, defaults to `JSON`.
	pub response_type: Option<String>,
	/// Image to replace (`X-Smug-ImageID`).
	pub image_id: Option<String>,
	/// `X-Smug-Caption`.
	pub caption: Option<String>,
	/// `X-Smug-Keywords`.
	pub keywords: Option<String>,
	/// `X-Smug-Latitude`.
	pub latitude: Option<String>,
	/// `X-Smug-Longitude`.
	pub longitude: Option<String>,
	/// `X-Smug-Altitude`.
	pub altitude: Option<String>,
	/// `X-Smug-Hidden`.
	pub hidden: Option<String>,
}
impl Upload {
	/// Creates an upload of `file` into `album_id`.
	pub fn new(file: impl Into<PathBuf>, album_id: impl Into<String>) -> Self {
		Self { file: file.into(), album_id: album_id.into(), ..Default::default() }
	}

	/// Reads an upload from legacy named arguments.
	///
	/// `File` and `AlbumID` are required; `FileName`, `ResponseType`, `ImageID`, `Caption`,
	/// `Keywords`, `Latitude`, `Longitude`, `Altitude`, and `Hidden` are optional.
	pub fn from_args(args: &Args) -> Result<Self> {
		let missing =
			["File", "AlbumID"].into_iter().filter(|key| !args.contains(key)).collect::<Vec<_>>();

		if !missing.is_empty() {
			return Err(Error::MissingArgument { method: IMAGES_UPLOAD, keys: missing });
		}

		let optional = |key| text_arg(args, key).map(|value| value.map(str::to_owned));

		Ok(Self {
			file: PathBuf::from(text_arg(args, "File")?.unwrap_or_default()),
			album_id: text_arg(args, "AlbumID")?.unwrap_or_default().to_owned(),
			file_name: optional("FileName")?,
			response_type: optional("ResponseType")?,
			image_id: optional("ImageID")?,
			caption: optional("Caption")?,
			keywords: optional("Keywords")?,
			latitude: optional("Latitude")?,
			longitude: optional("Longitude")?,
			altitude: optional("Altitude")?,
			hidden: optional("Hidden")?,
		})
	}

	/// Overrides the file name sent to the service.
	pub fn file_name(mut self, name: impl Into<String>) -> Self {
		self.file_name = Some(name.into());

		self
	}

	/// Overrides `X-Smug-ResponseType`.
	pub fn response_type(mut self, response_type: impl Into<String>) -> Self {
		self.response_type = Some(response_type.into());

		self
	}

	/// Replaces an existing image instead of adding a new one.
	pub fn replace(mut self, image_id: impl Into<String>) -> Self {
		self.image_id = Some(image_id.into());

		self
	}

	/// Sets the caption.
	pub fn caption(mut self, caption: impl Into<String>) -> Self {
		self.caption = Some(caption.into());

		self
	}

	/// Sets the keywords.
	pub fn keywords(mut self, keywords: impl Into<String>) -> Self {
		self.keywords = Some(keywords.into());

		self
	}

	/// Sets the geolocation; altitude is optional.
	pub fn location(mut self, latitude: f64, longitude: f64, altitude: Option<f64>) -> Self {
		self.latitude = Some(latitude.to_string());
		self.longitude = Some(longitude.to_string());
		self.altitude = altitude.map(|a| a.to_string());

		self
	}

	/// Sets the visibility flag.
	pub fn hidden(mut self, hidden: bool) -> Self {
		self.hidden = Some(hidden.to_string());

		self
	}

	/// File name sent to the service: the base name of the override, or of the local path.
	pub fn resolved_file_name(&self) -> Result<String> {
		let source = self.file_name.as_deref().map(Path::new).unwrap_or(self.file.as_path());

		source
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.filter(|name| !name.is_empty())
			.ok_or(Error::InvalidArgument {
				method: IMAGES_UPLOAD,
				key: if self.file_name.is_some() { "FileName" } else { "File" },
				reason: "path has no file name",
			})
	}

	// (argument name, header name, value)
	fn optional_headers(&self) -> [(&'static str, &'static str, Option<&String>); 7] {
		[
			("ImageID", "X-Smug-ImageID", self.image_id.as_ref()),
			("Caption", "X-Smug-Caption", self.caption.as_ref()),
			("Keywords", "X-Smug-Keywords", self.keywords.as_ref()),
			("Latitude", "X-Smug-Latitude", self.latitude.as_ref()),
			("Longitude", "X-Smug-Longitude", self.longitude.as_ref()),
			("Altitude", "X-Smug-Altitude", self.altitude.as_ref()),
			("Hidden", "X-Smug-Hidden", self.hidden.as_ref()),
		]
	}
}

impl<T, S> Client<T, S>
where
	T: ?Sized + Transport,
	S: ?Sized + Sanitizer,
{
	/// Uploads one file.
	///
	/// The file is read and hashed before any network activity, so a missing or unreadable file
	/// fails with [`Error::Io`] without touching the transport.
	pub async fn images_upload(&self, upload: &Upload) -> Result<Reply> {
		let span = CallSpan::new(IMAGES_UPLOAD, &Method::PUT);

		obs::record_call_outcome(IMAGES_UPLOAD, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let prepared = self.prepare_upload(upload)?;
				let response = self
					.send_signed(prepared.url.clone(), |url| self.upload_request(&prepared, url))
					.await?;

				self.decode(response)
			})
			.await;

		super::record_result(IMAGES_UPLOAD, &result);

		result
	}

	fn prepare_upload(&self, upload: &Upload) -> Result<PreparedUpload> {
		self.credentials.require_token()?;

		// Caller metadata ends up in `X-Smug-*` headers and must survive as a header value.
		let metadata_value = |key: &'static str, value: &str| -> Result<String> {
			let clean = sanitize_value(&*self.sanitizer, key, value)?;

			if HeaderValue::from_str(&clean).is_err() {
				return Err(Error::InvalidArgument {
					method: IMAGES_UPLOAD,
					key,
					reason: "value cannot be carried in an HTTP header",
				});
			}

			Ok(clean)
		};
		let file_name = percent_encode(&metadata_value("FileName", &upload.resolved_file_name()?)?);
		let response_type = metadata_value(
			"ResponseType",
			upload.response_type.as_deref().unwrap_or(DEFAULT_RESPONSE_TYPE),
		)?;
		let album_id = metadata_value("AlbumID", &upload.album_id)?;
		let mut optional = Vec::new();

		for (key, name, value) in upload.optional_headers() {
			if let Some(value) = value {
				optional.push((name, metadata_value(key, value)?));
			}
		}

		let body = std::fs::read(&upload.file)
			.map_err(|source| Error::Io { path: upload.file.clone(), source })?;
		let content_md5 = format!("{:x}", Md5::digest(&body));
		let raw = format!("{}/{file_name}", self.config.endpoints.upload_base());
		let url = Url::parse(&raw).map_err(|source| ConfigError::InvalidEndpoint {
			endpoint: "upload",
			value: raw.clone(),
			source,
		})?;
		let mut metadata = vec![
			("Content-MD5", content_md5),
			("Connection", "keep-alive".to_owned()),
			("X-Smug-Version", self.config.api_ver.clone()),
			("X-Smug-ResponseType", response_type),
			("X-Smug-AlbumID", album_id),
			("X-Smug-Filename", file_name),
		];

		metadata.extend(optional);

		Ok(PreparedUpload { url, body, metadata })
	}

	fn upload_request(&self, prepared: &PreparedUpload, url: &Url) -> Result<HttpRequest> {
		let authorization =
			self.authorization(&Method::PUT, url, true, &OAuthExtras::default(), &[])?;
		let mut headers = HeaderMap::new();

		insert_header(&mut headers, header::HOST.as_str(), &host_header(url))?;
		insert_header(&mut headers, header::USER_AGENT.as_str(), &self.config.user_agent())?;

		for (name, value) in &prepared.metadata {
			insert_header(&mut headers, name, value)?;
		}

		insert_header(&mut headers, header::AUTHORIZATION.as_str(), &authorization)?;

		Ok(HttpRequest { method: Method::PUT, url: url.clone(), headers, body: prepared.body.clone() })
	}
}

struct PreparedUpload {
	url: Url,
	body: Vec<u8>,
	metadata: Vec<(&'static str, String)>,
}

fn text_arg<'a>(args: &'a Args, key: &'static str) -> Result<Option<&'a str>> {
	match args.get(key) {
		Some(ArgValue::Text(text)) => Ok(Some(text)),
		Some(ArgValue::Params(_)) => Err(Error::InvalidArgument {
			method: IMAGES_UPLOAD,
			key,
			reason: "expected a single value, got key/value pairs",
		}),
		None => Ok(None),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	fn fixture(name: &str, bytes: &[u8]) -> PathBuf {
		let dir =
			std::env::temp_dir().join(format!("smugmug-compat-upload-unit-{}", std::process::id()));

		std::fs::create_dir_all(&dir).expect("Fixture directory should be creatable.");

		let path = dir.join(name);

		std::fs::write(&path, bytes).expect("Fixture file should be writable.");

		path
	}

	#[test]
	fn from_args_requires_file_and_album() {
		let err = Upload::from_args(&Args::new().with("Caption", "x"))
			.expect_err("File and AlbumID should be required.");

		assert!(matches!(
			err,
			Error::MissingArgument { method: "images_upload", ref keys } if keys == &["File", "AlbumID"]
		));
	}

	#[test]
	fn from_args_reads_optional_metadata() {
		let upload = Upload::from_args(
			&Args::new()
				.with("File", "/tmp/photo.jpg")
				.with("AlbumID", 42_i64)
				.with("Caption", "Sunset")
				.with("Hidden", true),
		)
		.expect("Arguments should parse.");

		assert_eq!(upload.file, PathBuf::from("/tmp/photo.jpg"));
		assert_eq!(upload.album_id, "42");
		assert_eq!(upload.caption.as_deref(), Some("Sunset"));
		assert_eq!(upload.hidden.as_deref(), Some("true"));
		assert_eq!(upload.keywords, None);
	}

	#[test]
	fn resolved_file_name_prefers_override_base_name() {
		let upload = Upload::new("/tmp/photo.jpg", "42");

		assert_eq!(upload.resolved_file_name().expect("Path has a file name."), "photo.jpg");

		let upload = upload.file_name("/elsewhere/My Trip.jpg");

		assert_eq!(upload.resolved_file_name().expect("Override has a file name."), "My Trip.jpg");
	}

	#[test]
	fn resolved_file_name_rejects_bare_directories() {
		let err = Upload::new("/", "42").resolved_file_name().expect_err("Root has no file name.");

		assert!(matches!(err, Error::InvalidArgument { key: "File", .. }));
	}

	#[test]
	fn location_formats_coordinates() {
		let upload = Upload::new("a.jpg", "1").location(45.5, -122.25, None);

		assert_eq!(upload.latitude.as_deref(), Some("45.5"));
		assert_eq!(upload.longitude.as_deref(), Some("-122.25"));
		assert_eq!(upload.altitude, None);
	}

	#[tokio::test]
	async fn upload_signature_covers_protocol_parameters_only() {
		let file = fixture("signed.jpg", b"signed-bytes");
		let (client, transport) = scripted_client([ScriptedReply::Respond(json_response("{}"))]);

		client
			.images_upload(&Upload::new(&file, "42").caption("Sunset").keywords("beach"))
			.await
			.expect("Upload should succeed.");

		let requests = transport.requests();
		let request = &requests[0];
		let sent = request.header_str("authorization").expect("Authorization header should be present.");

		assert_eq!(request.method, Method::PUT);
		assert_eq!(request.url.as_str(), "https://api.example.com/upload/signed.jpg");
		assert_eq!(request.body, b"signed-bytes".to_vec());
		assert_eq!(sent, resign(&client, request, &[]));
		assert_eq!(authorization_field(sent, "oauth_token"), Some(TEST_TOKEN));
		assert_eq!(authorization_field(sent, "oauth_callback"), None);
	}

	#[tokio::test]
	async fn upload_redirect_is_resigned_with_same_body() {
		let file = fixture("moved.jpg", b"moved-bytes");
		let (client, transport) = scripted_client([
			ScriptedReply::Respond(redirect_response(307, "https://upload2.example.com/upload/moved.jpg")),
			ScriptedReply::Respond(json_response("{}")),
		]);

		client.images_upload(&Upload::new(&file, "42")).await.expect("Redirected upload should succeed.");

		let requests = transport.requests();

		assert_eq!(requests.len(), 2);
		assert_eq!(requests[1].method, Method::PUT);
		assert_eq!(requests[1].url.as_str(), "https://upload2.example.com/upload/moved.jpg");
		assert_eq!(requests[1].header_str("host"), Some("upload2.example.com"));
		assert_eq!(requests[0].body, requests[1].body);
		assert_eq!(requests[0].header_str("content-md5"), requests[1].header_str("content-md5"));
		assert_ne!(requests[0].header_str("authorization"), requests[1].header_str("authorization"));
		assert_eq!(
			requests[1].header_str("authorization"),
			Some(resign(&client, &requests[1], &[]).as_str())
		);
	}

	#[tokio::test]
	async fn metadata_unfit_for_headers_is_invalid_argument() {
		let file = fixture("caption.jpg", b"caption-bytes");
		let (client, transport) = scripted_client([]);
		let err = client
			.images_upload(&Upload::new(&file, "42").caption("line one\nline two"))
			.await
			.expect_err("Multi-line captions cannot be sent as headers.");

		assert_eq!(err.kind(), crate::error::ErrorKind::InvalidInput);
		assert!(matches!(err, Error::InvalidArgument { method: "images_upload", key: "Caption", .. }));
		assert_eq!(transport.calls(), 0);
	}

	#[tokio::test]
	async fn file_name_header_matches_encoded_path() {
		let file = fixture("plain.jpg", b"plain-bytes");
		let (client, transport) = scripted_client([ScriptedReply::Respond(json_response("{}"))]);

		client
			.images_upload(&Upload::new(&file, "42").file_name("My Trip.jpg"))
			.await
			.expect("Upload should succeed.");

		let requests = transport.requests();

		assert_eq!(requests[0].url.as_str(), "https://api.example.com/upload/My%20Trip.jpg");
		assert_eq!(requests[0].header_str("x-smug-filename"), Some("My%20Trip.jpg"));
	}
}
