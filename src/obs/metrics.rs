// self
use crate::{http::StatusCode, obs::CallOutcome};

/// Counts a call outcome via the global metrics recorder (when enabled).
///
/// Failures are additionally labelled with their [`crate::error::ErrorKind`]; other outcomes use
/// `none`.
pub fn record_call_outcome(method: &'static str, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		let error_kind = outcome.error_kind().map_or("none", crate::error::ErrorKind::as_str);

		metrics::counter!(
			"smugmug_compat_call_total",
			"method" => method,
			"outcome" => outcome.as_str(),
			"error_kind" => error_kind
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (method, outcome);
	}
}

pub(crate) fn count_redirect(status: StatusCode) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("smugmug_compat_redirect_total", "status" => status.as_u16().to_string())
			.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = status;
	}
}
