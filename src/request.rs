//! Request descriptors handed to authorizers and transports.
//!
//! [`ApiRequest`] is deliberately transport-agnostic: a method, a fully resolved URL, a flat
//! header map, and an optional pre-serialized body. Query options are typed structs encoded
//! with `serde_urlencoded`; fields skipped via `skip_serializing_if` never reach the URL, which
//! gives the "omit if empty" behavior the API expects.

// self
use crate::{_prelude::*, error::ConfigError};

/// HTTP methods used by the API surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
}
impl HttpMethod {
	/// Returns the canonical method token.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
#[cfg(feature = "reqwest")]
impl From<HttpMethod> for reqwest::Method {
	fn from(method: HttpMethod) -> Self {
		match method {
			HttpMethod::Get => reqwest::Method::GET,
			HttpMethod::Post => reqwest::Method::POST,
		}
	}
}

/// Fully described outbound request.
///
/// Header names are stored lowercase; setting a header twice replaces the earlier value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: HttpMethod,
	/// Absolute target URL, including the query string.
	pub url: Url,
	/// Request headers keyed by lowercase name.
	pub headers: BTreeMap<String, String>,
	/// Serialized request body.
	pub body: Option<Vec<u8>>,
}
impl ApiRequest {
	/// Creates a request that accepts JSON responses.
	pub fn new(method: HttpMethod, url: Url) -> Self {
		let mut request = Self { method, url, headers: BTreeMap::new(), body: None };

		request.set_header("accept", "application/json");

		request
	}

	/// Shorthand for a `GET` request.
	pub fn get(url: Url) -> Self {
		Self::new(HttpMethod::Get, url)
	}

	/// Shorthand for a `POST` request.
	pub fn post(url: Url) -> Self {
		Self::new(HttpMethod::Post, url)
	}

	/// Replaces the query string with the encoded `options`.
	///
	/// An options value whose fields are all skipped removes the query string entirely.
	pub fn with_query<Q>(mut self, options: &Q) -> Result<Self>
	where
		Q: ?Sized + Serialize,
	{
		match encode_query(options)? {
			Some(query) => self.url.set_query(Some(&query)),
			None => self.url.set_query(None),
		}

		Ok(self)
	}

	/// Serializes `body` as JSON and marks the request accordingly.
	pub fn with_json<B>(mut self, body: &B) -> Result<Self>
	where
		B: ?Sized + Serialize,
	{
		let bytes =
			serde_json::to_vec(body).map_err(|source| ConfigError::InvalidBody { source })?;

		self.set_header("content-type", "application/json");
		self.body = Some(bytes);

		Ok(self)
	}

	/// Sets (or replaces) a header.
	pub fn set_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
		self.headers.insert(name.as_ref().to_ascii_lowercase(), value.into());
	}

	/// Returns a header value by case-insensitive name.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
	}

	/// Returns the body as UTF-8 text, when present and valid.
	pub fn body_text(&self) -> Option<&str> {
		self.body.as_deref().and_then(|bytes| std::str::from_utf8(bytes).ok())
	}
}
impl Debug for ApiRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("header_names", &self.headers.keys().collect::<Vec<_>>())
			.field("body_len", &self.body.as_ref().map(Vec::len))
			.finish()
	}
}

/// Page-size query shared by every list endpoint, serialized as `limit`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageQuery {
	/// Maximum number of records per page; omitted when zero.
	#[serde(skip_serializing_if = "is_zero")]
	pub limit: u32,
}
impl PageQuery {
	/// Creates a query asking for `limit` records per page.
	pub const fn new(limit: u32) -> Self {
		Self { limit }
	}
}

/// Encodes typed options into a query string, returning `None` when nothing remains.
pub fn encode_query<Q>(options: &Q) -> Result<Option<String>>
where
	Q: ?Sized + Serialize,
{
	let query =
		serde_urlencoded::to_string(options).map_err(|source| Error::InvalidOptions { source })?;

	Ok(if query.is_empty() { None } else { Some(query) })
}

fn is_zero(value: &u32) -> bool {
	*value == 0
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Test URL should parse.")
	}

	#[test]
	fn page_query_omits_zero_limit() {
		let encoded = encode_query(&PageQuery::new(200)).expect("Query should encode.");

		assert_eq!(encoded, Some("limit=200".into()));
		assert_eq!(encode_query(&PageQuery::default()).expect("Query should encode."), None);
	}

	#[test]
	fn with_query_replaces_existing_query() {
		let request = ApiRequest::get(url("https://example.okta.com/api/v1/users?limit=5"))
			.with_query(&PageQuery::new(150))
			.expect("Query should encode.");

		assert_eq!(request.url.as_str(), "https://example.okta.com/api/v1/users?limit=150");

		let cleared = request.with_query(&PageQuery::default()).expect("Query should encode.");

		assert_eq!(cleared.url.query(), None);
	}

	#[test]
	fn nested_options_are_rejected() {
		#[derive(Serialize)]
		struct Nested {
			inner: PageQuery,
		}

		let err = ApiRequest::get(url("https://example.okta.com/api/v1/users"))
			.with_query(&Nested { inner: PageQuery::new(1) })
			.expect_err("Nested structs cannot be encoded as query parameters.");

		assert!(matches!(err, Error::InvalidOptions { .. }));
	}

	#[test]
	fn json_body_sets_content_type() {
		let request = ApiRequest::post(url("https://example.okta.com/api/v1/users/00u1"))
			.with_json(&serde_json::json!({ "profile": { "dept": "eng" } }))
			.expect("Body should serialize.");

		assert_eq!(request.method, HttpMethod::Post);
		assert_eq!(request.header("Content-Type"), Some("application/json"));
		assert_eq!(request.header("accept"), Some("application/json"));
		assert_eq!(request.body_text(), Some("{\"profile\":{\"dept\":\"eng\"}}"));
	}

	#[test]
	fn debug_output_hides_header_values() {
		let mut request = ApiRequest::get(url("https://example.okta.com/api/v1/groups"));

		request.set_header("Authorization", "SSWS top-secret");

		let rendered = format!("{request:?}");

		assert!(rendered.contains("authorization"));
		assert!(!rendered.contains("top-secret"));
	}

	#[test]
	fn methods_render_as_wire_tokens() {
		let request = ApiRequest::post(url("https://example.okta.com/api/v1/authn"));

		assert_eq!(HttpMethod::Get.to_string(), "GET");
		assert_eq!(request.method.as_str(), "POST");
	}
}
