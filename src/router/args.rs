// self
use crate::_prelude::*;

/// One named argument value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgValue {
	/// A single string value (path segments, identifiers, raw payload bodies).
	Text(String),
	/// Ordered key/value pairs (structured payloads such as `AlbumData`).
	Params(Vec<(String, String)>),
}
impl ArgValue {
	/// Returns the text value, if this is [`ArgValue::Text`].
	pub fn as_text(&self) -> Option<&str> {
		match self {
			ArgValue::Text(text) => Some(text),
			ArgValue::Params(_) => None,
		}
	}
}
impl From<&str> for ArgValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}
impl From<String> for ArgValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}
impl From<&String> for ArgValue {
	fn from(value: &String) -> Self {
		Self::Text(value.clone())
	}
}
impl From<i64> for ArgValue {
	fn from(value: i64) -> Self {
		Self::Text(value.to_string())
	}
}
impl From<u64> for ArgValue {
	fn from(value: u64) -> Self {
		Self::Text(value.to_string())
	}
}
impl From<f64> for ArgValue {
	fn from(value: f64) -> Self {
		Self::Text(value.to_string())
	}
}
impl From<bool> for ArgValue {
	fn from(value: bool) -> Self {
		Self::Text(value.to_string())
	}
}
impl<K, V> From<Vec<(K, V)>> for ArgValue
where
	K: Into<String>,
	V: Into<String>,
{
	fn from(pairs: Vec<(K, V)>) -> Self {
		Self::Params(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}
impl<K, V, const N: usize> From<[(K, V); N]> for ArgValue
where
	K: Into<String>,
	V: Into<String>,
{
	fn from(pairs: [(K, V); N]) -> Self {
		Self::Params(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}

/// Named arguments of a legacy call, keyed by their 1.3-era names (`AlbumKey`, `Username`, ...).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args(BTreeMap<String, ArgValue>);
impl Args {
	/// Creates an empty argument set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an argument, replacing any previous value under the same name.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
		self.insert(key, value);

		self
	}

	/// Inserts an argument in place.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ArgValue>) {
		self.0.insert(key.into(), value.into());
	}

	/// Looks up an argument.
	pub fn get(&self, key: &str) -> Option<&ArgValue> {
		self.0.get(key)
	}

	/// Looks up a text argument; structured values yield `None`.
	pub fn text(&self, key: &str) -> Option<&str> {
		self.get(key).and_then(ArgValue::as_text)
	}

	/// Whether an argument with this name was supplied.
	pub fn contains(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Number of supplied arguments.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether no argument was supplied.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl<K, V> FromIterator<(K, V)> for Args
where
	K: Into<String>,
	V: Into<ArgValue>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}
