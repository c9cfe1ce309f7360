#![cfg(feature = "reqwest")]

// std
use std::{collections::BTreeMap, sync::Arc};
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use okta_client::{
	Client, Context, Error, ListUsersOptions, UserService, auth::StaticTokenAuthorizer,
};

const API_TOKEN: &str = "00test-token";

fn service(server: &MockServer) -> UserService {
	let client = Client::new(server.base_url(), StaticTokenAuthorizer::api_token(API_TOKEN))
		.expect("Client should build against the mock server.");

	UserService::new(Arc::new(client))
}

fn user_json(id: &str) -> serde_json::Value {
	json!({
		"id": id,
		"status": "ACTIVE",
		"created": "2024-03-01T10:00:00.000Z",
		"lastLogin": null,
		"lastUpdated": "2024-03-02T11:30:00.000Z",
		"passwordChanged": "2024-03-01T10:05:00.000Z",
		"profile": { "login": "ada@example.com", "dept": "eng" }
	})
}

#[tokio::test]
async fn get_user_sends_api_token_and_decodes() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v1/users/00u1")
				.header("authorization", format!("SSWS {API_TOKEN}"))
				.header("accept", "application/json");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(user_json("00u1"));
		})
		.await;
	let user = service(&server)
		.get_user(&Context::background(), "00u1")
		.await
		.expect("User lookup should succeed.");

	mock.assert_async().await;

	assert_eq!(user.id, "00u1");
	assert_eq!(user.status, "ACTIVE");
	assert_eq!(user.last_login, "");
	assert_eq!(user.profile.get("login").map(String::as_str), Some("ada@example.com"));
	assert!(user.password_changed_at().is_some());
}

#[tokio::test]
async fn authenticate_success_fetches_user_exactly_once() {
	let server = MockServer::start_async().await;
	let authn = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/v1/authn")
				.header("content-type", "application/json")
				.header("authorization", format!("SSWS {API_TOKEN}"))
				.json_body(json!({
					"username": "ada@example.com",
					"password": "correct horse",
					"relayState": "/dashboard",
					"options": {
						"warnBeforePasswordExpired": false,
						"multiOptionalFactorEnroll": false
					}
				}));
			then.status(200).json_body(json!({
				"status": "SUCCESS",
				"sessionToken": "20111abc",
				"_embedded": { "user": { "id": "00u9", "profile": { "login": "ada@example.com" } } }
			}));
		})
		.await;
	let lookup = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/users/00u9");
			then.status(200).json_body(user_json("00u9"));
		})
		.await;
	let user = service(&server)
		.authenticate(&Context::background(), "ada@example.com", "correct horse", "/dashboard")
		.await
		.expect("Authentication should succeed.");

	authn.assert_calls_async(1).await;
	lookup.assert_calls_async(1).await;

	assert_eq!(user.id, "00u9");
}

#[tokio::test]
async fn authenticate_other_status_skips_lookup() {
	let server = MockServer::start_async().await;
	let authn = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/authn");
			then.status(200).json_body(json!({
				"status": "MFA_REQUIRED",
				"_embedded": { "user": { "id": "00u9" } }
			}));
		})
		.await;
	let lookup = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/users/00u9");
			then.status(200).json_body(user_json("00u9"));
		})
		.await;
	let err = service(&server)
		.authenticate(&Context::background(), "ada@example.com", "wrong", "")
		.await
		.expect_err("Non-success status must fail.");

	authn.assert_calls_async(1).await;
	lookup.assert_calls_async(0).await;

	assert!(matches!(err, Error::AuthenticationFailed { ref status } if status == "MFA_REQUIRED"));
}

#[tokio::test]
async fn authenticate_success_without_user_is_rejected() {
	let server = MockServer::start_async().await;
	let _authn = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/authn");
			then.status(200).json_body(json!({ "status": "SUCCESS" }));
		})
		.await;
	let err = service(&server)
		.authenticate(&Context::background(), "ada@example.com", "correct horse", "")
		.await
		.expect_err("Missing embedded user must fail.");

	assert!(matches!(err, Error::MissingAuthenticatedUser));
}

#[tokio::test]
async fn rejected_credentials_surface_api_status() {
	let server = MockServer::start_async().await;
	let _authn = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/authn");
			then.status(401).json_body(json!({
				"errorCode": "E0000004",
				"errorSummary": "Authentication failed"
			}));
		})
		.await;
	let err = service(&server)
		.authenticate(&Context::background(), "ada@example.com", "wrong", "")
		.await
		.expect_err("HTTP 401 must fail.");

	match err {
		Error::ApiStatus { status, body } => {
			assert_eq!(status, 401);
			assert!(body.contains("E0000004"));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn update_custom_attributes_posts_profile_only() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/v1/users/00u1")
				.header("content-type", "application/json")
				.body("{\"profile\":{\"dept\":\"eng\"}}");
			then.status(200).body("not json, and not needed");
		})
		.await;
	let attributes = BTreeMap::from([("dept".to_owned(), "eng".to_owned())]);

	service(&server)
		.update_custom_attributes(&Context::background(), "00u1", &attributes)
		.await
		.expect("Update should ignore the response body.");

	mock.assert_async().await;
}

#[tokio::test]
async fn unexpected_shape_reports_decode_path() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/users/00u1");
			then.status(200).json_body(json!({
				"id": "00u1",
				"profile": { "tags": [] },
				"status": 7
			}));
		})
		.await;
	let err = service(&server)
		.get_user(&Context::background(), "00u1")
		.await
		.expect_err("Numeric status cannot decode.");

	match err {
		Error::Decode { source, status } => {
			assert_eq!(status, 200);
			assert_eq!(source.path().to_string(), "status");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn list_users_sends_limit_and_stops_at_budget() {
	let server = MockServer::start_async().await;
	let next = server.url("/api/v1/users?after=00u2&limit=2");
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/users").query_param("limit", "2");
			then.status(200)
				.header("link", format!("<{next}>; rel=\"next\""))
				.json_body(json!([user_json("00u1"), user_json("00u2")]));
		})
		.await;
	let users = service(&server)
		.list_users(&Context::background(), &ListUsersOptions::new(2, 1))
		.await
		.expect("Single page listing should succeed.");

	mock.assert_calls_async(1).await;

	assert_eq!(users.iter().map(|user| user.id.as_str()).collect::<Vec<_>>(), ["00u1", "00u2"]);
}

#[tokio::test]
async fn client_from_lookup_talks_to_configured_org() {
	let server = MockServer::start_async().await;
	let base_url = server.base_url();
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/users/00u1").header("authorization", "SSWS from-env");
			then.status(200).json_body(user_json("00u1"));
		})
		.await;
	let client = Client::from_lookup(|name| match name {
		"OKTA_ORG_URL" => Some(base_url.clone()),
		"OKTA_API_TOKEN" => Some("from-env".into()),
		_ => None,
	})
	.expect("Lookup-driven client should build.");

	UserService::new(Arc::new(client))
		.get_user(&Context::background(), "00u1")
		.await
		.expect("User lookup should succeed.");

	mock.assert_async().await;
}
