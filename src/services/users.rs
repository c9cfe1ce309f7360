//! User lookup, listing, authentication, and profile updates.

// crates.io
use serde::Deserializer;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
// self
use crate::{
	_prelude::*,
	client::Client,
	context::Context,
	obs::{self, OperationKind},
	request::{HttpMethod, PageQuery},
};

/// Largest page size accepted by the users endpoint.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Transaction status reported by `/api/v1/authn` for a completed login.
const AUTHN_SUCCESS: &str = "SUCCESS";

/// User account as returned by the users endpoints.
///
/// Timestamps are kept as the opaque strings the API returns; `null` becomes an empty string.
/// Use [`User::created_at`] and friends to parse them on demand.
///
/// The multi-word timestamps accept both the snake_case and the camelCase key. A payload that
/// carries both spellings of the same field fails to decode with a duplicate-field error.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Unique user id.
	#[serde(default, deserialize_with = "nullable_string")]
	pub id: String,
	/// Lifecycle status, e.g. `ACTIVE`.
	#[serde(default, deserialize_with = "nullable_string")]
	pub status: String,
	/// Creation timestamp.
	#[serde(default, deserialize_with = "nullable_string")]
	pub created: String,
	/// Last login timestamp.
	#[serde(default, alias = "lastLogin", deserialize_with = "nullable_string")]
	pub last_login: String,
	/// Last profile or status change.
	#[serde(default, alias = "lastUpdated", deserialize_with = "nullable_string")]
	pub last_updated: String,
	/// Last password change.
	#[serde(default, alias = "passwordChanged", deserialize_with = "nullable_string")]
	pub password_changed: String,
	/// Profile attributes, custom ones included.
	///
	/// `null` attributes are dropped; numbers and booleans keep their JSON text.
	#[serde(default, deserialize_with = "profile_attributes")]
	pub profile: BTreeMap<String, String>,
}
impl User {
	/// Parses [`User::created`] as RFC 3339.
	pub fn created_at(&self) -> Option<OffsetDateTime> {
		parse_timestamp(&self.created)
	}

	/// Parses [`User::last_login`] as RFC 3339.
	pub fn last_login_at(&self) -> Option<OffsetDateTime> {
		parse_timestamp(&self.last_login)
	}

	/// Parses [`User::last_updated`] as RFC 3339.
	pub fn last_updated_at(&self) -> Option<OffsetDateTime> {
		parse_timestamp(&self.last_updated)
	}

	/// Parses [`User::password_changed`] as RFC 3339.
	pub fn password_changed_at(&self) -> Option<OffsetDateTime> {
		parse_timestamp(&self.password_changed)
	}
}

/// Options accepted by [`UserService::list_users`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListUsersOptions {
	/// Records per page. Values outside `1..=200` fall back to 200.
	pub per_page: i32,
	/// Maximum number of pages to fetch; `0` walks every page.
	pub pages: u32,
}
impl ListUsersOptions {
	/// Creates options with the given page size and page budget.
	pub const fn new(per_page: i32, pages: u32) -> Self {
		Self { per_page, pages }
	}

	/// Page size actually sent to the API.
	pub fn page_size(&self) -> u32 {
		match u32::try_from(self.per_page) {
			Ok(size) if (1..=MAX_PAGE_SIZE).contains(&size) => size,
			_ => MAX_PAGE_SIZE,
		}
	}
}

/// Operations on `/api/v1/users` and `/api/v1/authn`.
#[derive(Clone, Debug)]
pub struct UserService {
	client: Arc<Client>,
}
impl UserService {
	/// Creates a service backed by `client`.
	pub fn new(client: Arc<Client>) -> Self {
		Self { client }
	}

	/// Returns the shared client.
	pub fn client(&self) -> &Arc<Client> {
		&self.client
	}

	/// Fetches one user by id.
	pub async fn get_user(&self, ctx: &Context, id: &str) -> Result<User> {
		obs::observe(OperationKind::GetUser, self.fetch_user(ctx, id)).await
	}

	/// Lists users page by page, following the `next` link within the page budget.
	pub async fn list_users(
		&self,
		ctx: &Context,
		options: &ListUsersOptions,
	) -> Result<Vec<User>> {
		obs::observe(OperationKind::ListUsers, async {
			let first = self
				.client
				.request(HttpMethod::Get, ["api", "v1", "users"])?
				.with_query(&PageQuery::new(options.page_size()))?;

			self.client.fetch_all(ctx, first, options.pages).await
		})
		.await
	}

	/// Verifies a username and password, then loads the authenticated user.
	///
	/// Any transaction status other than `SUCCESS` (MFA challenges, lockouts, expired
	/// passwords) fails with [`Error::AuthenticationFailed`] and no user is fetched.
	pub async fn authenticate(
		&self,
		ctx: &Context,
		username: &str,
		password: &str,
		relay_state: &str,
	) -> Result<User> {
		obs::observe(OperationKind::Authenticate, async {
			let body = AuthnRequest {
				username,
				password,
				relay_state,
				options: AuthnOptions::default(),
			};
			let request =
				self.client.request(HttpMethod::Post, ["api", "v1", "authn"])?.with_json(&body)?;
			let (_, transaction) =
				self.client.execute::<AuthnTransaction>(ctx, request).await?;

			if transaction.status != AUTHN_SUCCESS {
				return Err(Error::AuthenticationFailed { status: transaction.status });
			}

			let user_id = transaction.user_id().ok_or(Error::MissingAuthenticatedUser)?;

			self.fetch_user(ctx, user_id).await
		})
		.await
	}

	/// Replaces the given profile attributes on a user.
	///
	/// Only the supplied keys are sent; the response body is ignored.
	pub async fn update_custom_attributes(
		&self,
		ctx: &Context,
		id: &str,
		attributes: &BTreeMap<String, String>,
	) -> Result<()> {
		obs::observe(OperationKind::UpdateCustomAttributes, async {
			let request = self
				.client
				.request(HttpMethod::Post, ["api", "v1", "users", id])?
				.with_json(&ProfileUpdate { profile: attributes })?;

			self.client.execute_empty(ctx, request).await.map(|_| ())
		})
		.await
	}

	async fn fetch_user(&self, ctx: &Context, id: &str) -> Result<User> {
		let request = self.client.request(HttpMethod::Get, ["api", "v1", "users", id])?;
		let (_, user) = self.client.execute(ctx, request).await?;

		Ok(user)
	}
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthnRequest<'a> {
	username: &'a str,
	password: &'a str,
	relay_state: &'a str,
	options: AuthnOptions,
}

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthnOptions {
	warn_before_password_expired: bool,
	multi_optional_factor_enroll: bool,
}

#[derive(Deserialize)]
struct AuthnTransaction {
	#[serde(default, deserialize_with = "nullable_string")]
	status: String,
	#[serde(default, rename = "_embedded")]
	embedded: Option<AuthnEmbedded>,
}
impl AuthnTransaction {
	fn user_id(&self) -> Option<&str> {
		self.embedded
			.as_ref()
			.and_then(|embedded| embedded.user.as_ref())
			.map(|user| user.id.as_str())
			.filter(|id| !id.is_empty())
	}
}

#[derive(Deserialize)]
struct AuthnEmbedded {
	#[serde(default)]
	user: Option<AuthnUser>,
}

#[derive(Deserialize)]
struct AuthnUser {
	#[serde(default, deserialize_with = "nullable_string")]
	id: String,
}

#[derive(Serialize)]
struct ProfileUpdate<'a> {
	profile: &'a BTreeMap<String, String>,
}

fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
	if raw.is_empty() {
		return None;
	}

	OffsetDateTime::parse(raw, &Rfc3339).ok()
}

pub(crate) fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn profile_attributes<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();

	Ok(raw
		.into_iter()
		.filter_map(|(key, value)| match value {
			Value::Null => None,
			Value::String(text) => Some((key, text)),
			other => Some((key, other.to_string())),
		})
		.collect())
}
