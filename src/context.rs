//! Per-call cancellation and deadline carrier.
//!
//! Every public operation takes a [`Context`]. It is checked before each request is
//! dispatched (and at the top of every pagination step) and is handed to the
//! [`Authorizer`](crate::auth::Authorizer) and [`HttpTransport`](crate::http::HttpTransport)
//! so they can cooperate. In-flight requests are only aborted when the transport honors the
//! context itself; the bundled reqwest transport turns the remaining deadline into a request
//! timeout.

// crates.io
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
// self
use crate::_prelude::*;

/// Reason a [`Context`] stopped accepting work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
pub enum ContextError {
	/// [`Context::cancel`] was called on this context or one of its parents.
	#[error("Context was cancelled.")]
	Cancelled,
	/// The configured deadline has passed.
	#[error("Context deadline exceeded.")]
	DeadlineExceeded,
}

/// Cancellation token plus optional deadline shared by one logical operation.
#[derive(Clone, Debug)]
pub struct Context {
	token: CancellationToken,
	deadline: Option<OffsetDateTime>,
}
impl Context {
	/// Creates a context that is never cancelled and has no deadline.
	pub fn background() -> Self {
		Self { token: CancellationToken::new(), deadline: None }
	}

	/// Wraps an existing cancellation token, e.g. one owned by a server's shutdown logic.
	pub fn with_cancellation(token: CancellationToken) -> Self {
		Self { token, deadline: None }
	}

	/// Sets an absolute deadline. An earlier deadline already present is kept.
	pub fn with_deadline(mut self, deadline: OffsetDateTime) -> Self {
		self.deadline = Some(match self.deadline {
			Some(current) if current < deadline => current,
			_ => deadline,
		});

		self
	}

	/// Sets a deadline `timeout` from now.
	pub fn with_timeout(self, timeout: Duration) -> Self {
		self.with_deadline(OffsetDateTime::now_utc() + timeout)
	}

	/// Derives a context that is cancelled with this one but can also be cancelled on its own.
	pub fn child(&self) -> Self {
		Self { token: self.token.child_token(), deadline: self.deadline }
	}

	/// Cancels this context and every child derived from it.
	pub fn cancel(&self) {
		self.token.cancel();
	}

	/// Returns the underlying cancellation token.
	pub fn cancellation_token(&self) -> &CancellationToken {
		&self.token
	}

	/// Returns the configured deadline, if any.
	pub fn deadline(&self) -> Option<OffsetDateTime> {
		self.deadline
	}

	/// Time left before the deadline; negative once it has passed.
	pub fn remaining(&self) -> Option<Duration> {
		self.deadline.map(|deadline| deadline - OffsetDateTime::now_utc())
	}

	/// Reports why the context is done, or `None` while it still accepts work.
	pub fn err(&self) -> Option<ContextError> {
		if self.token.is_cancelled() {
			return Some(ContextError::Cancelled);
		}
		if self.remaining().is_some_and(|left| !left.is_positive()) {
			return Some(ContextError::DeadlineExceeded);
		}

		None
	}

	/// Returns `Ok(())` while the context still accepts work.
	pub fn check(&self) -> Result<(), ContextError> {
		match self.err() {
			Some(err) => Err(err),
			None => Ok(()),
		}
	}

	/// Future that resolves once the context is cancelled. Deadlines are not observed here.
	pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
		self.token.cancelled()
	}
}
impl Default for Context {
	fn default() -> Self {
		Self::background()
	}
}
