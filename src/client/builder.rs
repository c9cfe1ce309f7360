// self
use crate::{_prelude::*, auth::Authorizer, client::Client, error::ConfigError, http::HttpTransport};

/// Builder for [`Client`] values.
///
/// The base URL is validated in [`ClientBuilder::build`]. When no transport is supplied and the
/// `reqwest` feature is enabled, a default [`ReqwestTransport`](crate::http::ReqwestTransport)
/// is created.
pub struct ClientBuilder {
	/// Raw organization URL, parsed during [`ClientBuilder::build`].
	pub base_url: String,
	/// Optional transport override.
	pub transport: Option<Arc<dyn HttpTransport>>,
	/// Authorizer used for every request.
	pub authorizer: Option<Arc<dyn Authorizer>>,
}
impl ClientBuilder {
	/// Creates a new builder for `base_url`.
	pub fn new(base_url: impl AsRef<str>) -> Self {
		Self { base_url: base_url.as_ref().to_owned(), transport: None, authorizer: None }
	}

	/// Overrides the transport.
	pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
		self.transport = Some(transport);

		self
	}

	/// Sets the authorizer.
	pub fn authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
		self.authorizer = Some(authorizer);

		self
	}

	/// Consumes the builder and validates the resulting client.
	pub fn build(self) -> Result<Client> {
		let base_url = parse_base_url(&self.base_url)?;
		let authorizer = self.authorizer.ok_or(ConfigError::MissingAuthorizer)?;
		let transport = match self.transport {
			Some(transport) => transport,
			None => default_transport()?,
		};

		Ok(Client { base_url, transport, authorizer })
	}
}
impl Debug for ClientBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientBuilder")
			.field("base_url", &self.base_url)
			.field("transport", &self.transport.is_some())
			.field("authorizer", &self.authorizer.is_some())
			.finish()
	}
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
	let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

	if !matches!(url.scheme(), "http" | "https") {
		return Err(ConfigError::UnsupportedScheme { scheme: url.scheme().to_owned() });
	}
	if url.cannot_be_a_base() {
		return Err(ConfigError::CannotBeABase { url: url.to_string() });
	}

	Ok(url)
}

#[cfg(feature = "reqwest")]
fn default_transport() -> Result<Arc<dyn HttpTransport>> {
	Ok(Arc::new(crate::http::ReqwestTransport::new()?))
}

#[cfg(not(feature = "reqwest"))]
fn default_transport() -> Result<Arc<dyn HttpTransport>> {
	Err(ConfigError::MissingTransport.into())
}
