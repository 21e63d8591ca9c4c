// self
use crate::{
	_prelude::*,
	http::{Method, StatusCode},
};

/// Future returned by [`CallSpan::instrument`]: instrumented with `tracing`, passthrough otherwise.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`CallSpan::instrument`]: instrumented with `tracing`, passthrough otherwise.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// Span covering one legacy call, redirects included.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Opens a span for `method` (legacy identifier) sent as `verb`.
	pub fn new(method: &'static str, verb: &Method) -> Self {
		#[cfg(feature = "tracing")]
		{
			Self { span: tracing::info_span!("smugmug_compat.call", method, verb = verb.as_str()) }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, verb);

			Self {}
		}
	}

	/// Runs `fut` inside the span; no guard is held across `.await`.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

// Only the target URL is logged; headers (and with them the signature) and bodies never are.
pub(crate) fn trace_redirect(hop: u8, verb: &Method, status: StatusCode, location: &Url) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			hop,
			verb = verb.as_str(),
			status = status.as_u16(),
			location = %location,
			"re-signing redirected request"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (hop, verb, status, location);
	}
}
