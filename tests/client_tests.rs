//! SCIM client tests — baseline loading, auth header, error mapping, and
//! search query parameters.

mod helpers;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scim_membership::member::MemberKind;
use scim_membership::MembershipError;

use helpers::{bearer_client, group_json, list_response_json, role_json, scim_error_json, user_json};

#[tokio::test]
async fn test_group_members_seed_a_baseline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Groups/g1"))
        .and(header("Authorization", "Bearer test-token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(group_json(
            "g1",
            "Engineering",
            &[("u1", "alice"), ("u2", "bob")],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = bearer_client(&server);
    let members = client.group_members("g1").await.unwrap();

    assert_eq!(members.len(), 2);
    assert_eq!(members[0].id, "u1");
    assert_eq!(members[0].display, "alice");
    assert_eq!(members[0].kind, MemberKind::User);
}

#[tokio::test]
async fn test_get_role_parses_both_membership_attributes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Roles/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(role_json(
            "r1",
            "Administrator",
            &[("u1", "alice")],
            &[("g1", "Ops")],
        )))
        .mount(&server)
        .await;

    let client = bearer_client(&server);
    let role = client.get_role("r1").await.unwrap();

    let users = role.user_refs();
    assert_eq!(users[0].id, "u1");
    assert_eq!(users[0].kind, MemberKind::User);

    let groups = role.group_refs();
    assert_eq!(groups[0].id, "g1");
    assert_eq!(groups[0].kind, MemberKind::Group);
}

#[tokio::test]
async fn test_not_found_carries_the_backend_detail() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Groups/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "schemas": ["urn:ietf:params:scim:api:messages:2.0:Error"],
            "detail": "Group not found",
            "status": "404"
        })))
        .mount(&server)
        .await;

    let client = bearer_client(&server);
    let error = client.get_group("missing").await.unwrap_err();

    assert!(error.is_not_found());
    assert_eq!(error.user_message(), "Group not found");
}

#[tokio::test]
async fn test_older_endpoints_report_description_instead_of_detail() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/Groups/g1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "description": "Invalid member reference"
        })))
        .mount(&server)
        .await;

    let client = bearer_client(&server);
    let patch = scim_membership::model::ScimPatchRequest::new(vec![
        scim_membership::model::ScimPatchOp {
            op: "remove".to_string(),
            path: Some("members[value eq \"u1\"]".to_string()),
            value: None,
        },
    ]);
    let error = client.patch_group("g1", &patch).await.unwrap_err();

    assert_eq!(error.user_message(), "Invalid member reference");
}

#[tokio::test]
async fn test_conflict_maps_to_conflict_with_detail() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/Groups/g1"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(scim_error_json(409, "Group is being modified concurrently")),
        )
        .mount(&server)
        .await;

    let client = bearer_client(&server);
    let patch = scim_membership::model::ScimPatchRequest::new(vec![
        scim_membership::model::ScimPatchOp {
            op: "remove".to_string(),
            path: Some("members[value eq \"u1\"]".to_string()),
            value: None,
        },
    ]);
    let error = client.patch_group("g1", &patch).await.unwrap_err();

    assert!(matches!(error, MembershipError::Conflict { .. }));
    assert_eq!(error.user_message(), "Group is being modified concurrently");
}

#[tokio::test]
async fn test_malformed_success_body_is_a_serialization_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Groups/g1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = bearer_client(&server);
    let error = client.get_group("g1").await.unwrap_err();

    assert!(matches!(error, MembershipError::Serialization(_)));
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Groups/g1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let client = bearer_client(&server);
    let error = client.get_group("g1").await.unwrap_err();

    assert!(matches!(error, MembershipError::AuthError(_)));
}

#[tokio::test]
async fn test_search_users_sends_filter_and_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Users"))
        .and(query_param("filter", "userName co \"alice\""))
        .and(query_param("count", "10"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_response_json(vec![user_json("u1", "alice@example.com")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = bearer_client(&server);
    let response = client
        .search_users(Some("userName co \"alice\""), None, Some(10))
        .await
        .unwrap();

    assert_eq!(response.total_results, 1);
    assert_eq!(response.resources[0].user_name, "alice@example.com");
}

#[tokio::test]
async fn test_trailing_slash_in_base_url_is_normalized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Groups/g1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(group_json("g1", "Engineering", &[])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let auth = scim_membership::auth::Authenticator::new(
        scim_membership::auth::Credentials::Bearer {
            token: "test-token-123".to_string(),
        },
        reqwest::Client::new(),
    );
    let client = scim_membership::ScimClient::with_http_client(
        format!("{}/", server.uri()),
        auth,
        reqwest::Client::new(),
    );

    assert!(client.get_group("g1").await.is_ok());
}
