//! Integration tests for service group clients using HTTP stubbing.
//!
//! These tests use `MockHttpServer` to check what a built client actually
//! sends: group default headers and the bearer token obtained from the
//! authorized client manager.

mod common;

use std::sync::Arc;

use common::http_mock::MockHttpServer;
use gatekeeper_api::oauth2::{
    AccessToken, AuthorizationError, ClientDefaultsDsl, HttpServiceGroups,
    InMemoryAuthorizedClientManager, OAuth2ServiceGroupDsl, ServiceClientError,
};
use gk_dsl::{CompositionRoot, Section};
use serde_json::json;

fn all_groups(groups: &mut HttpServiceGroups) -> &mut HttpServiceGroups {
    groups
}

async fn manager_with(registration_id: &str, token: &str) -> Arc<InMemoryAuthorizedClientManager> {
    let manager = Arc::new(InMemoryAuthorizedClientManager::new());
    manager
        .insert(registration_id, AccessToken::new(token))
        .await;
    manager
}

#[tokio::test]
async fn test_bound_group_sends_bearer_token_and_default_headers() {
    let server = MockHttpServer::start().await;
    server
        .expect_get("/user")
        .with_header("Accept", "application/vnd.github.v3+json")
        .with_header("Authorization", "Bearer token-123")
        .respond_with_json(json!({"login": "octocat"}))
        .expect_times(1)
        .mount()
        .await;

    let manager = manager_with("github", "token-123").await;
    let mut groups = HttpServiceGroups::new(["github"]);
    ClientDefaultsDsl::new()
        .base_url(server.url())
        .default_header("Accept", "application/vnd.github.v3+json")
        .apply(&mut groups)
        .expect("defaults");
    OAuth2ServiceGroupDsl::new(manager)
        .apply(&mut groups)
        .expect("oauth2");

    let clients = groups.into_clients().expect("clients");
    let response = clients
        .client("github")
        .expect("github client")
        .get("user")
        .await
        .expect("should succeed");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["login"], "octocat");
}

#[tokio::test]
async fn test_registration_id_override() {
    let server = MockHttpServer::start().await;
    server
        .expect_get("/repos")
        .with_header("Authorization", "Bearer org-token")
        .respond_with_status(204)
        .expect_times(1)
        .mount()
        .await;

    let manager = manager_with("github-org", "org-token").await;
    let mut groups = HttpServiceGroups::new(["github"]);
    CompositionRoot::new()
        .section(
            "defaults",
            all_groups,
            ClientDefaultsDsl::new().base_url(server.url()),
        )
        .section(
            "oauth2",
            all_groups,
            OAuth2ServiceGroupDsl::new(manager).registration_id("github", "github-org"),
        )
        .build(&mut groups)
        .expect("sections apply");

    let clients = groups.into_clients().expect("clients");
    let response = clients
        .client("github")
        .expect("github client")
        .get("repos")
        .await
        .expect("should succeed");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
async fn test_unknown_registration_fails_before_sending() {
    let server = MockHttpServer::start().await;
    server
        .expect_get("/user")
        .respond_with_status(200)
        .expect_times(0)
        .mount()
        .await;

    let manager = Arc::new(InMemoryAuthorizedClientManager::new());
    let mut groups = HttpServiceGroups::new(["github"]);
    ClientDefaultsDsl::new()
        .base_url(server.url())
        .apply(&mut groups)
        .expect("defaults");
    OAuth2ServiceGroupDsl::new(manager)
        .apply(&mut groups)
        .expect("oauth2");

    let clients = groups.into_clients().expect("clients");
    let err = clients
        .client("github")
        .expect("github client")
        .get("user")
        .await
        .expect_err("no token registered");

    match err {
        ServiceClientError::Authorization { group, source } => {
            assert_eq!(group, "github");
            assert!(matches!(source, AuthorizationError::UnknownRegistration(id) if id == "github"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_disabled_oauth2_sends_no_authorization() {
    let server = MockHttpServer::start().await;
    server
        .expect_get("/public")
        .respond_with_body("ok")
        .expect_times(1)
        .mount()
        .await;

    let manager = manager_with("github", "token-123").await;
    let mut groups = HttpServiceGroups::new(["github"]);
    CompositionRoot::new()
        .section(
            "defaults",
            all_groups,
            ClientDefaultsDsl::new().base_url(server.url()),
        )
        .section("oauth2", all_groups, OAuth2ServiceGroupDsl::new(manager).disable())
        .build(&mut groups)
        .expect("sections apply");

    assert!(groups
        .get("github")
        .expect("github group")
        .oauth2()
        .is_none());

    let clients = groups.into_clients().expect("clients");
    let response = clients
        .client("github")
        .expect("github client")
        .get("public")
        .await
        .expect("should succeed");
    assert_eq!(response.text().await.expect("body"), "ok");
}

#[test]
fn test_unknown_group_is_an_error() {
    let clients = HttpServiceGroups::new(["github"])
        .into_clients()
        .expect("clients");
    assert!(matches!(
        clients.client("gitlab"),
        Err(ServiceClientError::UnknownGroup(name)) if name == "gitlab"
    ));
}

#[tokio::test]
async fn test_repeated_group_name_keeps_its_settings() {
    let server = MockHttpServer::start().await;
    server
        .expect_get("/status")
        .with_header("X-Team", "payments")
        .respond_with_status(200)
        .expect_times(1)
        .mount()
        .await;

    let mut groups = HttpServiceGroups::new(["billing", "billing"]);
    ClientDefaultsDsl::new()
        .base_url(server.url())
        .default_header("X-Team", "payments")
        .apply(&mut groups)
        .expect("defaults");

    let clients = groups.into_clients().expect("clients");
    assert_eq!(clients.len(), 1);
    let response = clients
        .client("billing")
        .expect("billing client")
        .get("status")
        .await
        .expect("should succeed");
    assert_eq!(response.status(), 200);
}

#[test]
fn test_non_http_base_url_is_rejected() {
    let mut groups = HttpServiceGroups::new(["github"]);
    let err = ClientDefaultsDsl::new()
        .base_url("ftp://example.com/")
        .apply(&mut groups)
        .expect_err("ftp base url");
    assert_eq!(err.path(), vec!["base_url"]);
}
