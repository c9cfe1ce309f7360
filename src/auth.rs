//! Authorization attachment for outbound requests.
//!
//! The client calls [`Authorizer::authorize`] right before every request reaches the
//! transport, including each page of a paginated walk, so implementations that mint or refresh
//! credentials always see the request they are decorating. Nothing is cached at this layer.

pub mod secret;

pub use secret::*;

// self
use crate::{_prelude::*, context::Context, request::ApiRequest};

type BoxError = Box<dyn StdError + Send + Sync>;

/// Boxed future returned by [`Authorizer::authorize`].
pub type AuthorizeFuture<'a> =
	Pin<Box<dyn Future<Output = Result<(), AuthorizationError>> + 'a + Send>>;

/// Attaches a credential (header, signature, ...) to a request.
///
/// Implementations are shared across calls and threads, so they must be `Send + Sync`; the
/// returned future must be `Send` so client operations can be spawned on multi-threaded
/// executors.
pub trait Authorizer
where
	Self: Send + Sync,
{
	/// Decorates `request` with a credential valid for `ctx`.
	fn authorize<'a>(
		&'a self,
		ctx: &'a Context,
		request: &'a mut ApiRequest,
	) -> AuthorizeFuture<'a>;
}

/// Failures raised while attaching credentials.
#[derive(Debug, ThisError)]
pub enum AuthorizationError {
	/// No credential is configured.
	#[error("No credential is available for the request.")]
	MissingCredential,
	/// The credential cannot be expressed as a header value.
	#[error("Credential is malformed: {reason}.")]
	InvalidCredential {
		/// Why the credential was rejected.
		reason: String,
	},
	/// The credential expired and could not be renewed.
	#[error("Credential expired and could not be renewed.")]
	Expired,
	/// A credential provider failed.
	#[error("Credential provider failed.")]
	Provider {
		/// Provider-specific failure.
		#[source]
		source: BoxError,
	},
}
impl AuthorizationError {
	/// Wraps a provider-specific failure.
	pub fn provider(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Provider { source: Box::new(src) }
	}
}

/// `Authorization` header schemes understood by the API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthScheme {
	#[default]
	/// Okta API token (`SSWS <token>`).
	Ssws,
	/// OAuth 2.0 access token (`Bearer <token>`).
	Bearer,
}
impl AuthScheme {
	/// Returns the scheme prefix used in the `Authorization` header.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthScheme::Ssws => "SSWS",
			AuthScheme::Bearer => "Bearer",
		}
	}
}

/// Authorizer that attaches the same long-lived token to every request.
#[derive(Clone)]
pub struct StaticTokenAuthorizer {
	scheme: AuthScheme,
	token: TokenSecret,
}
impl StaticTokenAuthorizer {
	/// Uses an Okta API token with the `SSWS` scheme.
	pub fn api_token(token: impl Into<TokenSecret>) -> Self {
		Self { scheme: AuthScheme::Ssws, token: token.into() }
	}

	/// Uses an OAuth 2.0 access token with the `Bearer` scheme.
	pub fn bearer(token: impl Into<TokenSecret>) -> Self {
		Self { scheme: AuthScheme::Bearer, token: token.into() }
	}

	/// Returns the configured scheme.
	pub fn scheme(&self) -> AuthScheme {
		self.scheme
	}

	fn header_value(&self) -> Result<String, AuthorizationError> {
		if self.token.is_blank() {
			return Err(AuthorizationError::MissingCredential);
		}
		if self.token.expose().chars().any(char::is_control) {
			return Err(AuthorizationError::InvalidCredential {
				reason: "token contains control characters".into(),
			});
		}

		Ok(format!("{} {}", self.scheme.as_str(), self.token.expose().trim()))
	}
}
impl Authorizer for StaticTokenAuthorizer {
	fn authorize<'a>(
		&'a self,
		_ctx: &'a Context,
		request: &'a mut ApiRequest,
	) -> AuthorizeFuture<'a> {
		Box::pin(async move {
			let value = self.header_value()?;

			request.set_header("authorization", value);

			Ok(())
		})
	}
}
impl Debug for StaticTokenAuthorizer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StaticTokenAuthorizer")
			.field("scheme", &self.scheme)
			.field("token", &self.token)
			.finish()
	}
}
