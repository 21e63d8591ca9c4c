// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters escaped by [`percent_encode`]: everything except RFC 3986 unreserved characters.
pub const RFC3986_RESERVED: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encodes `input` per RFC 3986, leaving `~` unescaped and turning a space into `%20`.
pub fn percent_encode(input: &str) -> String {
	utf8_percent_encode(input, RFC3986_RESERVED).to_string()
}
