//! Input sanitization capability applied to caller-supplied argument values.
//!
//! The client runs every path argument and upload metadata value through a [`Sanitizer`] before it
//! reaches a URL or header. Embedding applications may supply their own policy; [`TagStripper`] is
//! the stock implementation.

// self
use crate::_prelude::*;

/// Rejection reported by a [`Sanitizer`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{reason}")]
pub struct SanitizeError {
	/// Human readable reason.
	pub reason: String,
}
impl SanitizeError {
	/// Creates a rejection with the given reason.
	pub fn new(reason: impl Into<String>) -> Self {
		Self { reason: reason.into() }
	}
}

/// Cleans or rejects user-supplied strings.
pub trait Sanitizer
where
	Self: 'static + Send + Sync,
{
	/// Returns the cleaned value, or rejects it as unsafe.
	fn sanitize(&self, value: &str) -> Result<String, SanitizeError>;
}
impl<T> Sanitizer for Arc<T>
where
	T: ?Sized + Sanitizer,
{
	fn sanitize(&self, value: &str) -> Result<String, SanitizeError> {
		(**self).sanitize(value)
	}
}

/// Strips markup tags, trims surrounding whitespace, and rejects control characters.
#[derive(Clone, Copy, Debug, Default)]
pub struct TagStripper;
impl Sanitizer for TagStripper {
	fn sanitize(&self, value: &str) -> Result<String, SanitizeError> {
		if value.chars().any(|c| c.is_control() && !matches!(c, '\t' | '\n' | '\r')) {
			return Err(SanitizeError::new("value contains control characters"));
		}

		let mut out = String::with_capacity(value.len());
		let mut in_tag = false;

		for c in value.chars() {
			match (in_tag, c) {
				(false, '<') => in_tag = true,
				(true, '>') => in_tag = false,
				(false, c) => out.push(c),
				(true, _) => {},
			}
		}

		Ok(out.trim().to_owned())
	}
}
