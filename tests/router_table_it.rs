// self
use smugmug_compat::{
	config::Endpoints,
	error::{Error, ErrorKind},
	http::Method,
	router::{Args, LegacyMethod, Payload},
	sanitize::TagStripper,
};

type Row = (&'static str, Method, &'static str, &'static [&'static str], Option<&'static str>);

fn row(
	name: &'static str,
	verb: Method,
	template: &'static str,
	required: &'static [&'static str],
	payload: Option<&'static str>,
) -> Row {
	(name, verb, template, required, payload)
}

fn table() -> Vec<Row> {
	vec![
		row("auth_getRequestToken", Method::GET, "{accessBase}/getRequestToken", &["oauth_callback"], None),
		row(
			"auth_getAccessToken",
			Method::GET,
			"{accessBase}/getAccessToken",
			&["oauth_callback", "OauthVerifier"],
			None,
		),
		row("albums_get", Method::GET, "{base}/user/{Username}!albums", &["Username"], None),
		row("albums_getInfo", Method::GET, "{albumBase}/{AlbumKey}", &["AlbumKey"], None),
		row("images_get", Method::GET, "{albumBase}/{AlbumKey}!images", &["AlbumKey"], None),
		row("images_getInfo", Method::GET, "{imageBase}/{ImageKey}", &["ImageKey"], None),
		row("images_getURLs", Method::GET, "{imageBase}/{ImageKey}!sizedetails", &["ImageKey"], None),
		row("categories_get", Method::GET, "{folderBase}/{Username}!folders", &["Username"], None),
		row(
			"subcategories_get",
			Method::GET,
			"{folderBase}/{Username}/{ParentCategory}!folders",
			&["Username", "ParentCategory"],
			None,
		),
		row(
			"subcategories_delete",
			Method::DELETE,
			"{folderBase}/{Username}/{ParentCategory}/{ChildCategory}",
			&["Username", "ParentCategory", "ChildCategory"],
			None,
		),
		row(
			"categories_delete",
			Method::DELETE,
			"{folderBase}/{Username}/{Category}",
			&["Username", "Category"],
			None,
		),
		row("images_delete", Method::DELETE, "{imageBase}/{ImageKey}", &["ImageKey"], None),
		row("albums_delete", Method::DELETE, "{albumBase}/{AlbumKey}", &["AlbumKey"], None),
		row(
			"images_changeSettings",
			Method::PATCH,
			"{imageBase}/{ImageKey}",
			&["ImageKey", "ImageData"],
			Some("ImageData"),
		),
		row(
			"albums_changeSettings",
			Method::PATCH,
			"{albumBase}/{AlbumKey}",
			&["AlbumKey", "AlbumData"],
			Some("AlbumData"),
		),
		row(
			"categories_rename",
			Method::PATCH,
			"{folderBase}/{Username}/{Category}",
			&["Username", "Category", "CategoryData"],
			Some("CategoryData"),
		),
		row(
			"subcategories_rename",
			Method::PATCH,
			"{folderBase}/{Username}/{ParentCategory}/{ChildCategory}",
			&["Username", "ParentCategory", "ChildCategory", "SubcategoryData"],
			Some("SubcategoryData"),
		),
		row(
			"categories_create",
			Method::POST,
			"{folderBase}/{Username}!folders",
			&["Username", "CategoryData"],
			Some("CategoryData"),
		),
		row(
			"subcategories_create",
			Method::POST,
			"{folderBase}/{Username}/{ParentCategory}!folders",
			&["Username", "ParentCategory", "SubcategoryData"],
			Some("SubcategoryData"),
		),
		row(
			"albums_create",
			Method::POST,
			"{folderBase}/{Username}/{Category}!albums",
			&["Username", "Category", "AlbumData"],
			Some("AlbumData"),
		),
		row(
			"images_changePositions",
			Method::POST,
			"{albumBase}/{AlbumKey}!sortimages",
			&["AlbumKey", "ImageData"],
			Some("ImageData"),
		),
	]
}

fn full_args(required: &[&str], payload: Option<&str>) -> Args {
	required.iter().fold(Args::new(), |args, key| {
		if Some(*key) == payload {
			args.with(*key, [("Title", "Value")])
		} else {
			args.with(*key, format!("v-{key}"))
		}
	})
}

#[test]
fn every_method_matches_the_compatibility_table() {
	let table = table();

	assert_eq!(table.len(), LegacyMethod::ALL.len());

	for (name, verb, template, required, payload) in table {
		let method = name.parse::<LegacyMethod>().expect("Table identifier should be supported.");
		let route = method.route_spec();

		assert_eq!(method.as_str(), name);
		assert_eq!(route.verb, verb, "verb of {name}");
		assert_eq!(route.endpoint_template(), template, "template of {name}");
		assert_eq!(route.required, required, "required args of {name}");
		assert_eq!(route.payload, payload, "payload arg of {name}");
	}
}

#[test]
fn resolved_urls_substitute_every_placeholder() {
	let endpoints = Endpoints::new("https://api.example.com", "https://upload.example.com");

	for (name, verb, _, required, payload) in table() {
		let method = name.parse::<LegacyMethod>().expect("Table identifier should be supported.");
		let spec = method
			.resolve(&full_args(required, payload), &endpoints, &TagStripper)
			.expect("Complete arguments should resolve.");

		assert_eq!(spec.verb, verb);
		assert!(spec.url.as_str().starts_with("https://api.example.com/"), "url of {name}");
		assert!(!spec.url.as_str().contains('{'), "url of {name} still has a placeholder");
		assert_eq!(spec.requires_token, name != "auth_getRequestToken");

		match payload {
			Some(_) => assert_eq!(
				spec.payload,
				Some(Payload::Params(vec![("Title".into(), "Value".into())])),
				"payload of {name}"
			),
			None => assert_eq!(spec.payload, None, "payload of {name}"),
		}
	}
}

#[test]
fn missing_arguments_are_all_named() {
	let endpoints = Endpoints::default();

	for method in LegacyMethod::ALL {
		let err = method
			.resolve(&Args::new(), &endpoints, &TagStripper)
			.expect_err("Empty arguments should be rejected.");

		assert_eq!(err.kind(), ErrorKind::MissingArgument);

		match err {
			Error::MissingArgument { method: name, keys } => {
				assert_eq!(name, method.as_str());
				assert_eq!(keys, method.route_spec().required);
			},
			other => panic!("Unexpected error for {method}: {other:?}"),
		}
	}
}

#[test]
fn partial_arguments_name_only_the_missing_keys() {
	let err = LegacyMethod::SubcategoriesRename
		.resolve(
			&Args::new().with("Username", "jane").with("ChildCategory", "c"),
			&Endpoints::default(),
			&TagStripper,
		)
		.expect_err("Missing arguments should be rejected.");

	assert!(matches!(
		err,
		Error::MissingArgument { ref keys, .. } if keys == &["ParentCategory", "SubcategoryData"]
	));
}

#[test]
fn albums_get_info_scenario_url() {
	let endpoints = Endpoints::new("https://api.example.com", "https://upload.example.com");
	let spec = LegacyMethod::AlbumsGetInfo
		.resolve(&Args::new().with("AlbumKey", "abc123"), &endpoints, &TagStripper)
		.expect("AlbumKey should resolve.");

	assert_eq!(spec.verb, Method::GET);
	assert_eq!(spec.url.as_str(), "https://api.example.com/api/v2/album/abc123");
}

#[test]
fn raw_text_payload_is_kept_verbatim() {
	let spec = LegacyMethod::ImagesChangePositions
		.resolve(
			&Args::new().with("AlbumKey", "k").with("ImageData", r#"{"MoveUris":["/a"]}"#),
			&Endpoints::default(),
			&TagStripper,
		)
		.expect("Raw payload should resolve.");

	assert_eq!(spec.payload, Some(Payload::Raw(r#"{"MoveUris":["/a"]}"#.into())));
}
