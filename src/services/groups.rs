//! Group listing and membership lookups.
//!
//! Every group operation walks all pages with a fixed page size. Only standard Okta groups are
//! returned; app-imported and built-in groups are filtered out before projection.

// self
use crate::{
	_prelude::*,
	client::Client,
	context::Context,
	obs::{self, OperationKind},
	pagination::PageBudget,
	request::{HttpMethod, PageQuery},
	services::users::{User, nullable_string},
};

/// Group `type` kept by the group operations.
pub const STANDARD_GROUP_TYPE: &str = "OKTA_GROUP";
/// Page size used by every group listing.
pub const GROUP_PAGE_SIZE: u32 = 200;

/// Standard group projected from the API representation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
	/// Unique group id.
	pub id: String,
	/// Display name taken from the group profile.
	pub name: String,
}

/// Operations on `/api/v1/groups` and a user's group memberships.
#[derive(Clone, Debug)]
pub struct GroupService {
	client: Arc<Client>,
}
impl GroupService {
	/// Creates a service backed by `client`.
	pub fn new(client: Arc<Client>) -> Self {
		Self { client }
	}

	/// Returns the shared client.
	pub fn client(&self) -> &Arc<Client> {
		&self.client
	}

	/// Lists every standard group in the organization.
	pub async fn list_groups(&self, ctx: &Context) -> Result<Vec<Group>> {
		obs::observe(OperationKind::ListGroups, async {
			let records: Vec<GroupRecord> = self.walk(ctx, ["api", "v1", "groups"]).await?;

			Ok(standard_groups(records))
		})
		.await
	}

	/// Lists the members of a group.
	pub async fn list_group_members(&self, ctx: &Context, group_id: &str) -> Result<Vec<User>> {
		obs::observe(
			OperationKind::ListGroupMembers,
			self.walk(ctx, ["api", "v1", "groups", group_id, "users"]),
		)
		.await
	}

	/// Lists the standard groups a user belongs to.
	pub async fn list_user_groups(&self, ctx: &Context, user_id: &str) -> Result<Vec<Group>> {
		obs::observe(OperationKind::ListUserGroups, async {
			let records: Vec<GroupRecord> =
				self.walk(ctx, ["api", "v1", "users", user_id, "groups"]).await?;

			Ok(standard_groups(records))
		})
		.await
	}

	async fn walk<T, const N: usize>(&self, ctx: &Context, segments: [&str; N]) -> Result<Vec<T>>
	where
		T: DeserializeOwned,
	{
		let first = self
			.client
			.request(HttpMethod::Get, segments)?
			.with_query(&PageQuery::new(GROUP_PAGE_SIZE))?;

		self.client.fetch_all(ctx, first, PageBudget::UNLIMITED).await
	}
}

#[derive(Debug, Deserialize)]
struct GroupRecord {
	#[serde(default, deserialize_with = "nullable_string")]
	id: String,
	#[serde(default, rename = "type", deserialize_with = "nullable_string")]
	kind: String,
	#[serde(default)]
	profile: Option<GroupProfile>,
}
impl GroupRecord {
	fn is_standard(&self) -> bool {
		self.kind == STANDARD_GROUP_TYPE
	}

	fn into_group(self) -> Group {
		Group { id: self.id, name: self.profile.map(|profile| profile.name).unwrap_or_default() }
	}
}

#[derive(Debug, Deserialize)]
struct GroupProfile {
	#[serde(default, deserialize_with = "nullable_string")]
	name: String,
}

fn standard_groups(records: Vec<GroupRecord>) -> Vec<Group> {
	records.into_iter().filter(GroupRecord::is_standard).map(GroupRecord::into_group).collect()
}
