//! Lists the first pages of users and every standard group of an organization.
//!
//! Configure the organization with `OKTA_ORG_URL` (e.g. `https://acme.okta.com`) and an API
//! token with `OKTA_API_TOKEN`, then run `cargo run --example list_users`.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use time::Duration;
// self
use okta_client::{Client, Context, GroupService, ListUsersOptions, UserService};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let client = Arc::new(Client::from_env()?);
	let users = UserService::new(client.clone());
	let groups = GroupService::new(client);
	let ctx = Context::background().with_timeout(Duration::seconds(30));
	let listed = users.list_users(&ctx, &ListUsersOptions::new(50, 2)).await?;

	println!("{} users (first two pages):", listed.len());

	for user in &listed {
		let login = user.profile.get("login").map(String::as_str).unwrap_or("-");

		println!("  {} {login} [{}]", user.id, user.status);
	}

	let standard = groups.list_groups(&ctx).await?;

	println!("{} standard groups:", standard.len());

	for group in &standard {
		println!("  {} {}", group.id, group.name);
	}

	Ok(())
}
