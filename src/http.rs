//! Transport primitives for API calls.
//!
//! The module exposes [`HttpTransport`] alongside [`RawResponse`] and [`ResponseMetadata`] so
//! downstream crates can plug in custom HTTP stacks (or scripted fakes in tests). A transport
//! performs exactly one attempt per call and reports the status, every header value, and the
//! raw body; status classification and JSON decoding happen in [`Client`](crate::Client).

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::HeaderMap;
// self
use crate::{_prelude::*, context::Context, error::TransportError, request::ApiRequest};

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing [`ApiRequest`]s.
///
/// The trait is the client's only dependency on an HTTP library. Implementations must be
/// `Send + Sync + 'static` so one instance can back many clients, and the futures they return
/// must be `Send`. Implementations should stop early when `ctx` is done, but are not required
/// to abort requests already on the wire.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` once and returns whatever the server answered, whatever its status.
	fn execute<'a>(&'a self, ctx: &'a Context, request: ApiRequest) -> TransportFuture<'a>;
}

/// Multi-valued response headers keyed by lowercase name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderValues(BTreeMap<String, Vec<String>>);
impl HeaderValues {
	/// Appends a value for `name`, keeping earlier values.
	pub fn append(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
		self.0.entry(name.as_ref().to_ascii_lowercase()).or_default().push(value.into());
	}

	/// Returns every value recorded for `name` in arrival order.
	pub fn get_all(&self, name: &str) -> &[String] {
		self.0.get(&name.to_ascii_lowercase()).map(Vec::as_slice).unwrap_or_default()
	}

	/// Returns the first value recorded for `name`.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.get_all(name).first().map(String::as_str)
	}

	/// Iterates over `(name, values)` pairs.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.0.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
	}
}
impl<K, V> FromIterator<(K, V)> for HeaderValues
where
	K: AsRef<str>,
	V: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		let mut headers = Self::default();

		for (name, value) in iter {
			headers.append(name, value);
		}

		headers
	}
}

/// Status and headers of a response, kept after the body has been consumed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// HTTP status code.
	pub status: u16,
	/// Response headers.
	pub headers: HeaderValues,
}
impl ResponseMetadata {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Undecoded response returned by a transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawResponse {
	/// Status and headers.
	pub metadata: ResponseMetadata,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Builds a response from parts; convenient for custom transports and fakes.
	pub fn new(status: u16, headers: HeaderValues, body: impl Into<Vec<u8>>) -> Self {
		Self { metadata: ResponseMetadata { status, headers }, body: body.into() }
	}

	/// Returns `true` when the body holds nothing but whitespace.
	pub fn is_body_blank(&self) -> bool {
		self.body.iter().all(u8::is_ascii_whitespace)
	}

	/// Lossy UTF-8 view of the body.
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// User agent sent by [`ReqwestTransport::new`].
	pub const USER_AGENT: &'static str = concat!("okta-client/", env!("CARGO_PKG_VERSION"));

	/// Builds a reqwest client identifying itself with [`Self::USER_AGENT`].
	pub fn new() -> Result<Self> {
		let client = ReqwestClient::builder()
			.user_agent(Self::USER_AGENT)
			.build()
			.map_err(crate::error::ConfigError::from)?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn execute<'a>(&'a self, ctx: &'a Context, request: ApiRequest) -> TransportFuture<'a> {
		Box::pin(async move {
			ctx.check().map_err(TransportError::network)?;

			let ApiRequest { method, url, headers, body } = request;
			let mut builder = self.0.request(method.into(), url);

			for (name, value) in &headers {
				builder = builder.header(name.as_str(), value.as_str());
			}
			if let Some(body) = body {
				builder = builder.body(body);
			}
			if let Some(remaining) = ctx.remaining() {
				builder = builder.timeout(
					std::time::Duration::try_from(remaining).unwrap_or(std::time::Duration::ZERO),
				);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let headers = collect_headers(response.headers());
			let body = response.bytes().await?.to_vec();

			Ok(RawResponse::new(status, headers, body))
		})
	}
}

#[cfg(feature = "reqwest")]
fn collect_headers(headers: &HeaderMap) -> HeaderValues {
	headers
		.iter()
		.filter_map(|(name, value)| value.to_str().ok().map(|value| (name.as_str(), value)))
		.collect()
}
