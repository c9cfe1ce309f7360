//! Client-level error types shared across requests, pagination, and domain services.

// self
use crate::{_prelude::*, auth::AuthorizationError, context::ContextError};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Query options could not be encoded into URL parameters.
	#[error("Query options could not be encoded.")]
	InvalidOptions {
		/// Underlying encoding failure.
		#[source]
		source: serde_urlencoded::ser::Error,
	},
	/// No credential could be attached to the request.
	#[error(transparent)]
	Authorization(#[from] AuthorizationError),
	/// Transport failure (DNS, TCP, TLS, timeouts).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The context was cancelled or its deadline passed.
	#[error(transparent)]
	Context(#[from] ContextError),

	/// A path segment (typically a caller-supplied id) would not address a single resource.
	#[error("Path segment `{segment}` is not a valid resource identifier.")]
	InvalidPathSegment {
		/// Rejected segment.
		segment: String,
	},

	/// Response body does not match the expected shape.
	#[error("Response body (HTTP {status}) does not match the expected shape.")]
	Decode {
		/// Structured parsing failure, including the JSON path that failed.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response that failed to decode.
		status: u16,
	},
	/// API answered with a non-success HTTP status.
	#[error("API responded with HTTP {status}.")]
	ApiStatus {
		/// HTTP status code.
		status: u16,
		/// Raw response body, kept for caller inspection.
		body: String,
	},
	/// Authentication endpoint answered with a status other than `SUCCESS`.
	#[error("Authentication failed with status `{status}`; check the username and password.")]
	AuthenticationFailed {
		/// Transaction status reported by the API.
		status: String,
	},
	/// Authentication succeeded but the response carried no user identity.
	#[error("Authentication response is missing the embedded user.")]
	MissingAuthenticatedUser,
}
impl Error {
	/// Returns the HTTP status code attached to the error, when one is known.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::ApiStatus { status, .. } | Self::Decode { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised while building clients or requests.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than `http` or `https`.
	#[error("Base URL must use http or https, got `{scheme}`.")]
	UnsupportedScheme {
		/// Rejected scheme.
		scheme: String,
	},
	/// Base URL cannot carry path segments (e.g. `mailto:`).
	#[error("Base URL `{url}` cannot be used as a base for API paths.")]
	CannotBeABase {
		/// Rejected URL.
		url: String,
	},
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be serialized.")]
	InvalidBody {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// Builder was finalized without an authorizer.
	#[error("Client builder requires an authorizer.")]
	MissingAuthorizer,
	/// Builder was finalized without a transport and no default transport is compiled in.
	#[error("Client builder requires a transport.")]
	MissingTransport,
	/// Required environment variable is not set.
	#[error("Environment variable `{name}` is not set.")]
	MissingEnv {
		/// Variable name.
		name: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, timeouts).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request did not complete before its timeout.
	#[error("Request timed out while calling the API.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn status_is_exposed_for_http_failures() {
		let err = Error::ApiStatus { status: 404, body: "{\"errorCode\":\"E0000007\"}".into() };

		assert_eq!(err.status(), Some(404));
		assert_eq!(err.to_string(), "API responded with HTTP 404.");
		assert_eq!(Error::MissingAuthenticatedUser.status(), None);
	}

	#[test]
	fn context_errors_convert_transparently() {
		let err = Error::from(ContextError::Cancelled);

		assert!(matches!(err, Error::Context(ContextError::Cancelled)));
		assert_eq!(err.to_string(), ContextError::Cancelled.to_string());
	}
}
