//! API client core: request construction, authorization, dispatch, and decoding.
//!
//! [`Client`] owns the base URL plus the two collaborators every call goes through: an
//! [`Authorizer`] and an [`HttpTransport`]. Domain services hold an `Arc<Client>` and build
//! on [`Client::request`], [`Client::execute`], [`Client::execute_empty`], and
//! [`Client::fetch_all`](crate::Client::fetch_all).

/// Builder API for assembling clients.
pub mod builder;

pub use builder::*;

// self
use crate::{
	_prelude::*,
	auth::{Authorizer, StaticTokenAuthorizer},
	context::Context,
	error::ConfigError,
	http::{HttpTransport, RawResponse, ResponseMetadata},
	request::{ApiRequest, HttpMethod},
};

/// Environment variable holding the organization URL for [`Client::from_env`].
pub const ORG_URL_ENV: &str = "OKTA_ORG_URL";
/// Environment variable holding the API token for [`Client::from_env`].
pub const API_TOKEN_ENV: &str = "OKTA_API_TOKEN";

/// Shared handle for issuing authorized API calls.
///
/// Cloning is cheap and clones share the same transport and authorizer. The client keeps no
/// per-call state, so one instance can serve concurrent operations.
#[derive(Clone)]
pub struct Client {
	/// Organization base URL (e.g. `https://acme.okta.com`).
	pub base_url: Url,
	/// Transport used for every outbound request.
	pub transport: Arc<dyn HttpTransport>,
	/// Authorizer invoked before every request.
	pub authorizer: Arc<dyn Authorizer>,
}
impl Client {
	/// Starts building a client for `base_url`.
	pub fn builder(base_url: impl AsRef<str>) -> ClientBuilder {
		ClientBuilder::new(base_url)
	}

	/// Creates a client backed by the default reqwest transport.
	#[cfg(feature = "reqwest")]
	pub fn new(base_url: impl AsRef<str>, authorizer: impl 'static + Authorizer) -> Result<Self> {
		ClientBuilder::new(base_url).authorizer(Arc::new(authorizer)).build()
	}

	/// Creates a client from `OKTA_ORG_URL` and `OKTA_API_TOKEN` (SSWS scheme).
	#[cfg(feature = "reqwest")]
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Same as [`Client::from_env`] but reads variables through `lookup`.
	#[cfg(feature = "reqwest")]
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let required = |name: &'static str| {
			lookup(name)
				.filter(|value| !value.trim().is_empty())
				.ok_or(ConfigError::MissingEnv { name })
		};
		let base_url = required(ORG_URL_ENV)?;
		let token = required(API_TOKEN_ENV)?;

		Self::new(base_url, StaticTokenAuthorizer::api_token(token))
	}

	/// Resolves API path segments against the base URL, percent-encoding each segment.
	///
	/// A path already present on the base URL is kept as a prefix. Empty, `.` and `..` segments
	/// are rejected with [`Error::InvalidPathSegment`].
	pub fn endpoint<I, S>(&self, segments: I) -> Result<Url>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut url = self.base_url.clone();

		url.set_query(None);
		url.set_fragment(None);

		{
			let mut path = url
				.path_segments_mut()
				.map_err(|_| ConfigError::CannotBeABase { url: self.base_url.to_string() })?;

			path.pop_if_empty();

			for segment in segments {
				let segment = segment.as_ref();

				if matches!(segment, "" | "." | "..") {
					return Err(Error::InvalidPathSegment { segment: segment.to_owned() });
				}

				path.push(segment);
			}
		}

		Ok(url)
	}

	/// Builds a request descriptor for `method` on the given path segments.
	pub fn request<I, S>(&self, method: HttpMethod, segments: I) -> Result<ApiRequest>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Ok(ApiRequest::new(method, self.endpoint(segments)?))
	}

	/// Authorizes and sends `request`, then decodes the JSON body into `T`.
	pub async fn execute<T>(
		&self,
		ctx: &Context,
		request: ApiRequest,
	) -> Result<(ResponseMetadata, T)>
	where
		T: DeserializeOwned,
	{
		let response = self.dispatch(ctx, request).await?;
		let value = decode_body(&response)?;

		Ok((response.metadata, value))
	}

	/// Authorizes and sends `request` without looking at the response body.
	pub async fn execute_empty(
		&self,
		ctx: &Context,
		request: ApiRequest,
	) -> Result<ResponseMetadata> {
		self.dispatch(ctx, request).await.map(|response| response.metadata)
	}

	/// Runs one request through the authorizer and the transport.
	///
	/// Non-2xx responses become [`Error::ApiStatus`]. Transport failures observed after the
	/// context is done are reported as the context error.
	pub(crate) async fn dispatch(
		&self,
		ctx: &Context,
		mut request: ApiRequest,
	) -> Result<RawResponse> {
		ctx.check()?;
		self.authorizer.authorize(ctx, &mut request).await?;

		let response = match self.transport.execute(ctx, request).await {
			Ok(response) => response,
			Err(e) => return Err(ctx.err().map(Error::from).unwrap_or_else(|| e.into())),
		};

		if !response.metadata.is_success() {
			return Err(Error::ApiStatus {
				status: response.metadata.status,
				body: response.body_text(),
			});
		}

		Ok(response)
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("base_url", &self.base_url.as_str())
			.finish_non_exhaustive()
	}
}

/// Decodes a JSON body, reporting the failing path on mismatch.
pub(crate) fn decode_body<T>(response: &RawResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::Decode { source, status: response.metadata.status })
}
