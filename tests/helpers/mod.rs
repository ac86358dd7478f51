//! Shared helpers for integration tests — mock SCIM backend plumbing and a
//! recording notification sink.

#![allow(dead_code)]

use std::sync::Mutex;

use serde_json::{json, Value};
use wiremock::MockServer;

use scim_membership::auth::{Authenticator, Credentials};
use scim_membership::client::ScimClient;
use scim_membership::submit::{AlertLevel, Notifier};

/// Create a `ScimClient` pointing at a wiremock server with Bearer auth.
pub fn bearer_client(server: &MockServer) -> ScimClient {
    let auth = Authenticator::new(
        Credentials::Bearer {
            token: "test-token-123".to_string(),
        },
        reqwest::Client::new(),
    );
    ScimClient::with_http_client(server.uri(), auth, reqwest::Client::new())
}

/// Create a `ScimClient` using OAuth2 client credentials, with the token
/// endpoint served by the same wiremock server under `/oauth2/token`.
pub fn oauth2_client(server: &MockServer, scopes: Vec<String>) -> ScimClient {
    let auth = Authenticator::new(
        Credentials::OAuth2 {
            client_id: "console-client".to_string(),
            client_secret: "console-secret".to_string(),
            token_endpoint: format!("{}/oauth2/token", server.uri()),
            scopes,
        },
        reqwest::Client::new(),
    );
    ScimClient::with_http_client(server.uri(), auth, reqwest::Client::new())
}

/// Build an OAuth2 token endpoint response body.
pub fn token_json(access_token: &str, expires_in: u64) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": expires_in
    })
}

/// Notification sink that records every alert for later assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<(AlertLevel, String)>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: AlertLevel, message: &str) {
        self.alerts
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<(AlertLevel, String)> {
        self.alerts.lock().unwrap().clone()
    }
}

/// Build a SCIM group response JSON with the given `(id, display)` members.
pub fn group_json(id: &str, display_name: &str, members: &[(&str, &str)]) -> Value {
    let members: Vec<Value> = members
        .iter()
        .map(|(mid, mdisplay)| json!({ "value": mid, "display": mdisplay }))
        .collect();

    json!({
        "schemas": ["urn:ietf:params:scim:schemas:core:2.0:Group"],
        "id": id,
        "displayName": display_name,
        "members": members,
        "meta": {
            "resourceType": "Group",
            "location": format!("/Groups/{id}")
        }
    })
}

/// Build a SCIM role response JSON with user and group assignments.
pub fn role_json(
    id: &str,
    display_name: &str,
    users: &[(&str, &str)],
    groups: &[(&str, &str)],
) -> Value {
    let to_values = |pairs: &[(&str, &str)]| -> Vec<Value> {
        pairs
            .iter()
            .map(|(v, d)| json!({ "value": v, "display": d }))
            .collect()
    };

    json!({
        "schemas": ["urn:ietf:params:scim:schemas:extension:2.0:Role"],
        "id": id,
        "displayName": display_name,
        "users": to_values(users),
        "groups": to_values(groups)
    })
}

/// Build a SCIM error response body with a structured `detail`.
pub fn scim_error_json(status: u16, detail: &str) -> Value {
    json!({
        "schemas": ["urn:ietf:params:scim:api:messages:2.0:Error"],
        "detail": detail,
        "status": status.to_string()
    })
}

/// Build a SCIM list response wrapping the given resources.
pub fn list_response_json(resources: Vec<Value>) -> Value {
    let total = resources.len() as i64;
    json!({
        "schemas": ["urn:ietf:params:scim:api:messages:2.0:ListResponse"],
        "totalResults": total,
        "startIndex": 1,
        "itemsPerPage": total,
        "Resources": resources
    })
}

/// Build a SCIM user resource JSON for search results.
pub fn user_json(id: &str, user_name: &str) -> Value {
    json!({
        "schemas": ["urn:ietf:params:scim:schemas:core:2.0:User"],
        "id": id,
        "userName": user_name
    })
}
