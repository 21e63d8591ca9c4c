//! Endpoint router: the closed table of legacy methods and its resolution into [`RequestSpec`]s.
//!
//! Every supported 1.3-era identifier is a [`LegacyMethod`] variant carrying its verb, endpoint
//! template, required arguments, and payload argument. Resolution is pure: it validates arguments,
//! sanitizes and percent-encodes path segments, and never touches the network.

mod args;
mod spec;

pub use args::*;
pub use spec::*;

// self
use crate::{
	_prelude::*,
	config::Endpoints,
	error::ConfigError,
	http::Method,
	oauth::percent_encode,
	sanitize::Sanitizer,
};

/// Endpoint base a route template hangs off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndpointBase {
	/// `{accessBase}`: OAuth token endpoints.
	Access,
	/// `{base}`: versioned API root.
	Base,
	/// `{albumBase}`.
	Album,
	/// `{folderBase}`.
	Folder,
	/// `{imageBase}`.
	Image,
}
impl EndpointBase {
	/// Template placeholder name.
	pub const fn placeholder(self) -> &'static str {
		match self {
			EndpointBase::Access => "accessBase",
			EndpointBase::Base => "base",
			EndpointBase::Album => "albumBase",
			EndpointBase::Folder => "folderBase",
			EndpointBase::Image => "imageBase",
		}
	}

	/// Resolves the base against configured endpoints.
	pub fn resolve(self, endpoints: &Endpoints) -> String {
		match self {
			EndpointBase::Access => endpoints.access_base(),
			EndpointBase::Base => endpoints.base(),
			EndpointBase::Album => endpoints.album_base(),
			EndpointBase::Folder => endpoints.folder_base(),
			EndpointBase::Image => endpoints.image_base(),
		}
	}
}

/// Static routing entry of a [`LegacyMethod`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteSpec {
	/// HTTP verb.
	pub verb: Method,
	/// Endpoint base.
	pub base: EndpointBase,
	/// Path template appended to the base, with `{Arg}` placeholders.
	pub path: &'static str,
	/// Arguments that must be supplied.
	pub required: &'static [&'static str],
	/// Argument carried as the request body, if any.
	pub payload: Option<&'static str>,
}
impl RouteSpec {
	/// Full endpoint template, for example `{albumBase}/{AlbumKey}!images`.
	pub fn endpoint_template(&self) -> String {
		format!("{{{}}}{}", self.base.placeholder(), self.path)
	}
}

macro_rules! legacy_methods {
	($($variant:ident => $name:literal,)+) => {
		/// Closed set of supported legacy method identifiers.
		#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
		pub enum LegacyMethod {
			$(
				#[doc = concat!("`", $name, "`.")]
				$variant,
			)+
		}
		impl LegacyMethod {
			/// Every supported method, in table order.
			pub const ALL: &'static [LegacyMethod] = &[$(LegacyMethod::$variant,)+];

			/// Legacy identifier.
			pub const fn as_str(self) -> &'static str {
				match self {
					$(LegacyMethod::$variant => $name,)+
				}
			}
		}
		impl FromStr for LegacyMethod {
			type Err = Error;

			fn from_str(s: &str) -> Result<Self> {
				match s {
					$($name => Ok(LegacyMethod::$variant),)+
					_ => Err(Error::UnsupportedMethod { method: s.to_owned() }),
				}
			}
		}
	};
}

legacy_methods! {
	AuthGetRequestToken => "auth_getRequestToken",
	AuthGetAccessToken => "auth_getAccessToken",
	AlbumsGet => "albums_get",
	AlbumsGetInfo => "albums_getInfo",
	ImagesGet => "images_get",
	ImagesGetInfo => "images_getInfo",
	ImagesGetUrls => "images_getURLs",
	CategoriesGet => "categories_get",
	SubcategoriesGet => "subcategories_get",
	SubcategoriesDelete => "subcategories_delete",
	CategoriesDelete => "categories_delete",
	ImagesDelete => "images_delete",
	AlbumsDelete => "albums_delete",
	ImagesChangeSettings => "images_changeSettings",
	AlbumsChangeSettings => "albums_changeSettings",
	CategoriesRename => "categories_rename",
	SubcategoriesRename => "subcategories_rename",
	CategoriesCreate => "categories_create",
	SubcategoriesCreate => "subcategories_create",
	AlbumsCreate => "albums_create",
	ImagesChangePositions => "images_changePositions",
}

impl LegacyMethod {
	/// Routing entry for this method.
	pub fn route_spec(self) -> RouteSpec {
		use EndpointBase::*;
		use LegacyMethod::*;

		let (verb, base, path, required, payload): (_, _, _, &'static [&'static str], _) = match self {
			AuthGetRequestToken =>
				(Method::GET, Access, "/getRequestToken", &["oauth_callback"], None),
			AuthGetAccessToken =>
				(Method::GET, Access, "/getAccessToken", &["oauth_callback", "OauthVerifier"], None),
			AlbumsGet => (Method::GET, Base, "/user/{Username}!albums", &["Username"], None),
			AlbumsGetInfo => (Method::GET, Album, "/{AlbumKey}", &["AlbumKey"], None),
			ImagesGet => (Method::GET, Album, "/{AlbumKey}!images", &["AlbumKey"], None),
			ImagesGetInfo => (Method::GET, Image, "/{ImageKey}", &["ImageKey"], None),
			ImagesGetUrls => (Method::GET, Image, "/{ImageKey}!sizedetails", &["ImageKey"], None),
			CategoriesGet => (Method::GET, Folder, "/{Username}!folders", &["Username"], None),
			SubcategoriesGet => (
				Method::GET,
				Folder,
				"/{Username}/{ParentCategory}!folders",
				&["Username", "ParentCategory"],
				None,
			),
			SubcategoriesDelete => (
				Method::DELETE,
				Folder,
				"/{Username}/{ParentCategory}/{ChildCategory}",
				&["Username", "ParentCategory", "ChildCategory"],
				None,
			),
			CategoriesDelete =>
				(Method::DELETE, Folder, "/{Username}/{Category}", &["Username", "Category"], None),
			ImagesDelete => (Method::DELETE, Image, "/{ImageKey}", &["ImageKey"], None),
			AlbumsDelete => (Method::DELETE, Album, "/{AlbumKey}", &["AlbumKey"], None),
			ImagesChangeSettings =>
				(Method::PATCH, Image, "/{ImageKey}", &["ImageKey", "ImageData"], Some("ImageData")),
			AlbumsChangeSettings =>
				(Method::PATCH, Album, "/{AlbumKey}", &["AlbumKey", "AlbumData"], Some("AlbumData")),
			CategoriesRename => (
				Method::PATCH,
				Folder,
				"/{Username}/{Category}",
				&["Username", "Category", "CategoryData"],
				Some("CategoryData"),
			),
			SubcategoriesRename => (
				Method::PATCH,
				Folder,
				"/{Username}/{ParentCategory}/{ChildCategory}",
				&["Username", "ParentCategory", "ChildCategory", "SubcategoryData"],
				Some("SubcategoryData"),
			),
			CategoriesCreate => (
				Method::POST,
				Folder,
				"/{Username}!folders",
				&["Username", "CategoryData"],
				Some("CategoryData"),
			),
			SubcategoriesCreate => (
				Method::POST,
				Folder,
				"/{Username}/{ParentCategory}!folders",
				&["Username", "ParentCategory", "SubcategoryData"],
				Some("SubcategoryData"),
			),
			AlbumsCreate => (
				Method::POST,
				Folder,
				"/{Username}/{Category}!albums",
				&["Username", "Category", "AlbumData"],
				Some("AlbumData"),
			),
			ImagesChangePositions => (
				Method::POST,
				Album,
				"/{AlbumKey}!sortimages",
				&["AlbumKey", "ImageData"],
				Some("ImageData"),
			),
		};

		RouteSpec { verb, base, path, required, payload }
	}

	/// Whether calls to this method are signed with `oauth_token`.
	pub fn requires_token(self) -> bool {
		self != LegacyMethod::AuthGetRequestToken
	}

	/// Resolves `args` into a [`RequestSpec`] without any network activity.
	///
	/// Fails with [`Error::MissingArgument`] naming every absent required key, then with
	/// [`Error::InvalidArgument`] / [`Error::UnsafeInput`] for malformed path values.
	pub fn resolve<S>(self, args: &Args, endpoints: &Endpoints, sanitizer: &S) -> Result<RequestSpec>
	where
		S: ?Sized + Sanitizer,
	{
		let route = self.route_spec();
		let missing =
			route.required.iter().copied().filter(|key| !args.contains(key)).collect::<Vec<_>>();

		if !missing.is_empty() {
			return Err(Error::MissingArgument { method: self.as_str(), keys: missing });
		}

		let path = render_path(route.path, |key| {
			let value = self.text_arg(args, key)?;
			let clean = sanitize_value(sanitizer, key, value)?;

			if clean.is_empty() {
				return Err(Error::InvalidArgument {
					method: self.as_str(),
					key,
					reason: "path segments must not be empty",
				});
			}

			Ok(percent_encode(&clean))
		})?;
		let raw = format!("{}{path}", route.base.resolve(endpoints));
		let url = Url::parse(&raw).map_err(|source| ConfigError::InvalidEndpoint {
			endpoint: route.base.placeholder(),
			value: raw.clone(),
			source,
		})?;
		let payload = route.payload.and_then(|key| args.get(key)).map(|value| match value {
			ArgValue::Params(pairs) => Payload::Params(pairs.clone()),
			ArgValue::Text(body) => Payload::Raw(body.clone()),
		});
		let extras = match self {
			LegacyMethod::AuthGetRequestToken => OAuthExtras {
				callback: Some(sanitize_value(
					sanitizer,
					"oauth_callback",
					self.text_arg(args, "oauth_callback")?,
				)?),
				verifier: None,
			},
			LegacyMethod::AuthGetAccessToken => OAuthExtras {
				callback: None,
				verifier: Some(sanitize_value(
					sanitizer,
					"OauthVerifier",
					self.text_arg(args, "OauthVerifier")?,
				)?),
			},
			_ => OAuthExtras::default(),
		};

		Ok(RequestSpec {
			name: self.as_str(),
			verb: route.verb,
			url,
			payload,
			requires_token: self.requires_token(),
			extras,
		})
	}

	fn text_arg<'a>(self, args: &'a Args, key: &'static str) -> Result<&'a str> {
		match args.get(key) {
			Some(ArgValue::Text(text)) => Ok(text),
			Some(ArgValue::Params(_)) => Err(Error::InvalidArgument {
				method: self.as_str(),
				key,
				reason: "expected a single value, got key/value pairs",
			}),
			None => Err(Error::MissingArgument { method: self.as_str(), keys: vec![key] }),
		}
	}
}
impl Display for LegacyMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `value` through the sanitizer, mapping rejections to [`Error::UnsafeInput`].
pub fn sanitize_value<S>(sanitizer: &S, key: &str, value: &str) -> Result<String>
where
	S: ?Sized + Sanitizer,
{
	sanitizer
		.sanitize(value)
		.map_err(|e| Error::UnsafeInput { key: key.to_owned(), reason: e.reason })
}

// Placeholders are `{Name}` with `Name` drawn from the route's static argument list.
fn render_path<F>(template: &'static str, mut segment: F) -> Result<String>
where
	F: FnMut(&'static str) -> Result<String>,
{
	let mut out = String::with_capacity(template.len() + 16);
	let mut rest = template;

	while let Some(open) = rest.find('{') {
		out.push_str(&rest[..open]);

		let after = &rest[open + 1..];
		let close = after.find('}').unwrap_or(after.len());

		out.push_str(&segment(&after[..close])?);

		rest = after.get(close + 1..).unwrap_or_default();
	}

	out.push_str(rest);

	Ok(out)
}
