//! Optional observability helpers for dispatched calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to wrap every call in a `smugmug_compat.call` span carrying the legacy
//!   `method` and HTTP `verb`, with a debug event for each redirect hop.
//! - Enable `metrics` to count calls in `smugmug_compat_call_total` (labels `method`, `outcome`,
//!   `error_kind`) and followed hops in `smugmug_compat_redirect_total` (label `status`).
//!
//! With both features off every helper compiles to a no-op.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{
	_prelude::*,
	error::ErrorKind,
	http::{Method, StatusCode},
};

/// Outcome recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a dispatch.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller, with its classification.
	Failure(ErrorKind),
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure(_) => "failure",
		}
	}

	/// Error classification of a failed call.
	pub const fn error_kind(self) -> Option<ErrorKind> {
		match self {
			CallOutcome::Failure(kind) => Some(kind),
			CallOutcome::Attempt | CallOutcome::Success => None,
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self.error_kind() {
			Some(kind) => write!(f, "{}({kind})", self.as_str()),
			None => f.write_str(self.as_str()),
		}
	}
}

/// Records one followed redirect: the `verb` request answered with `status` now targets
/// `location` on hop number `hop`.
pub fn record_redirect(hop: u8, verb: &Method, status: StatusCode, location: &Url) {
	trace_redirect(hop, verb, status, location);
	count_redirect(status);
}
