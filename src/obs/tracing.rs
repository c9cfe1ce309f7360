// self
use crate::{_prelude::*, obs::OperationKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used by service operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation kind.
	pub fn new(kind: OperationKind) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("okta_client.operation", operation = kind.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = kind;

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
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

/// Emits a `debug` event describing a fetched page (when tracing is enabled).
pub fn trace_page(page: u32, items: usize, has_next: bool) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(page, items, has_next, "fetched page");
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (page, items, has_next);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn page_events_never_panic() {
		trace_page(1, 200, true);
		trace_page(2, 0, false);
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = OperationSpan::new(OperationKind::ListGroups);
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
