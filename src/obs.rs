//! Optional observability helpers for client operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run every service call inside an `okta_client.operation` span with an
//!   `operation` field, and to emit a `debug` event per fetched page.
//! - Enable `metrics` to increment `okta_client_operation_total` for every
//!   attempt/success/failure (labeled by `operation` + `outcome`) and `okta_client_pages_total`
//!   for every fetched page.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations exposed by the domain services.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Single user lookup.
	GetUser,
	/// Paginated user listing.
	ListUsers,
	/// Username/password authentication.
	Authenticate,
	/// Profile attribute update.
	UpdateCustomAttributes,
	/// Group listing.
	ListGroups,
	/// Members of one group.
	ListGroupMembers,
	/// Groups of one user.
	ListUserGroups,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::GetUser => "get_user",
			OperationKind::ListUsers => "list_users",
			OperationKind::Authenticate => "authenticate",
			OperationKind::UpdateCustomAttributes => "update_custom_attributes",
			OperationKind::ListGroups => "list_groups",
			OperationKind::ListGroupMembers => "list_group_members",
			OperationKind::ListUserGroups => "list_user_groups",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a service operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `operation` inside its span and records attempt + outcome.
pub(crate) async fn observe<T, Fut>(kind: OperationKind, operation: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = OperationSpan::new(kind);

	record_operation_outcome(kind, OperationOutcome::Attempt);

	let result = span.instrument(operation).await;

	match &result {
		Ok(_) => record_operation_outcome(kind, OperationOutcome::Success),
		Err(_) => record_operation_outcome(kind, OperationOutcome::Failure),
	}

	result
}

/// Records one fetched page in every enabled backend.
pub(crate) fn record_page(page: u32, items: usize, has_next: bool) {
	trace_page(page, items, has_next);
	record_page_fetched();
}
