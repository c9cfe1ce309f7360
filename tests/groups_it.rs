#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use okta_client::{Client, Context, Error, Group, GroupService, auth::StaticTokenAuthorizer};

fn service(server: &MockServer) -> GroupService {
	let client = Client::new(server.base_url(), StaticTokenAuthorizer::api_token("00group-token"))
		.expect("Client should build against the mock server.");

	GroupService::new(Arc::new(client))
}

fn group_json(id: &str, kind: &str, name: &str) -> serde_json::Value {
	json!({
		"id": id,
		"type": kind,
		"created": "2024-01-10T08:00:00.000Z",
		"profile": { "name": name, "description": null }
	})
}

#[tokio::test]
async fn list_groups_keeps_standard_groups_in_order() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v1/groups")
				.query_param("limit", "200")
				.header("authorization", "SSWS 00group-token");
			then.status(200).json_body(json!([
				group_json("00g1", "OKTA_GROUP", "Engineering"),
				group_json("00g2", "APP_GROUP", "Imported from AD"),
				group_json("00g3", "OKTA_GROUP", "Design"),
			]));
		})
		.await;
	let groups = service(&server)
		.list_groups(&Context::background())
		.await
		.expect("Group listing should succeed.");

	mock.assert_calls_async(1).await;

	assert_eq!(groups, vec![
		Group { id: "00g1".into(), name: "Engineering".into() },
		Group { id: "00g3".into(), name: "Design".into() },
	]);
}

#[tokio::test]
async fn list_group_members_returns_users() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/groups/00g1/users").query_param("limit", "200");
			then.status(200).json_body(json!([
				{ "id": "00u1", "status": "ACTIVE", "profile": { "login": "ada@example.com" } },
				{ "id": "00u2", "status": "SUSPENDED", "profile": { "login": "bob@example.com" } }
			]));
		})
		.await;
	let members = service(&server)
		.list_group_members(&Context::background(), "00g1")
		.await
		.expect("Member listing should succeed.");

	mock.assert_async().await;

	assert_eq!(members.len(), 2);
	assert_eq!(members[1].status, "SUSPENDED");
	assert_eq!(members[0].profile.get("login").map(String::as_str), Some("ada@example.com"));
}

#[tokio::test]
async fn list_user_groups_filters_non_standard_groups() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/users/00u1/groups").query_param("limit", "200");
			then.status(200).json_body(json!([
				group_json("00g0", "BUILT_IN", "Everyone"),
				group_json("00g1", "OKTA_GROUP", "Engineering"),
			]));
		})
		.await;
	let groups = service(&server)
		.list_user_groups(&Context::background(), "00u1")
		.await
		.expect("User group listing should succeed.");

	mock.assert_async().await;

	assert_eq!(groups, vec![Group { id: "00g1".into(), name: "Engineering".into() }]);
}

#[tokio::test]
async fn missing_group_surfaces_api_status() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/groups/00gX/users");
			then.status(404).json_body(json!({
				"errorCode": "E0000007",
				"errorSummary": "Not found: Resource not found: 00gX (UserGroup)"
			}));
		})
		.await;
	let err = service(&server)
		.list_group_members(&Context::background(), "00gX")
		.await
		.expect_err("Unknown group must fail.");

	assert_eq!(err.status(), Some(404));
	assert!(matches!(err, Error::ApiStatus { ref body, .. } if body.contains("E0000007")));
}
