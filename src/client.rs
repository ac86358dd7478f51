//! SCIM 2.0 HTTP client (reqwest-based) for membership editing.
//!
//! The identity backend is an external collaborator consumed only through
//! its request/response contract: fetch an entity's membership list to
//! populate a baseline, submit a patch document, receive success or a
//! structured error.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::Authenticator;
use crate::config::TargetConfig;
use crate::error::{MembershipError, MembershipResult};
use crate::member::MemberRef;
use crate::model::{
    GroupResource, RoleResource, ScimErrorResponse, ScimListResponse, ScimPatchRequest,
    UserResource,
};

/// SCIM 2.0 HTTP client for the membership editing surface.
#[derive(Debug, Clone)]
pub struct ScimClient {
    /// Base URL of the SCIM API, without trailing slash.
    base_url: String,
    auth: Authenticator,
    http_client: Client,
}

impl ScimClient {
    /// Build a client from a target configuration.
    pub fn from_config(config: &TargetConfig) -> MembershipResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .danger_accept_invalid_certs(!config.tls_verify)
            .user_agent("scim-membership/0.1")
            .build()
            .map_err(|e| {
                MembershipError::InvalidConfig(format!("Failed to build HTTP client: {e}"))
            })?;

        let auth = Authenticator::new(config.credentials.clone(), http_client.clone());

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth,
            http_client,
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    #[must_use]
    pub fn with_http_client(base_url: String, auth: Authenticator, http_client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            http_client,
        }
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Baseline loading ──────────────────────────────────────────────

    /// Fetch a group including its current membership list (GET /Groups/:id).
    pub async fn get_group(&self, id: &str) -> MembershipResult<GroupResource> {
        let url = format!("{}/Groups/{}", self.base_url, id);
        self.get(&url).await
    }

    /// Fetch a role including its user and group assignments (GET /Roles/:id).
    pub async fn get_role(&self, id: &str) -> MembershipResult<RoleResource> {
        let url = format!("{}/Roles/{}", self.base_url, id);
        self.get(&url).await
    }

    /// A group's members as normalized references, ready to seed a baseline.
    pub async fn group_members(&self, id: &str) -> MembershipResult<Vec<MemberRef>> {
        Ok(self.get_group(id).await?.member_refs())
    }

    // ── Patch submission ──────────────────────────────────────────────

    /// Apply membership changes to a group (PATCH /Groups/:id).
    pub async fn patch_group(&self, id: &str, patch: &ScimPatchRequest) -> MembershipResult<()> {
        let url = format!("{}/Groups/{}", self.base_url, id);
        self.patch(&url, patch).await
    }

    /// Apply membership changes to a role (PATCH /Roles/:id).
    pub async fn patch_role(&self, id: &str, patch: &ScimPatchRequest) -> MembershipResult<()> {
        let url = format!("{}/Roles/{}", self.base_url, id);
        self.patch(&url, patch).await
    }

    // ── Candidate search ──────────────────────────────────────────────

    /// List users with optional filter and pagination (GET /Users).
    pub async fn search_users(
        &self,
        filter: Option<&str>,
        start_index: Option<i64>,
        count: Option<i64>,
    ) -> MembershipResult<ScimListResponse<UserResource>> {
        let url = format!("{}/Users", self.base_url);
        self.get_with_params(&url, filter, start_index, count).await
    }

    /// List groups with optional filter and pagination (GET /Groups).
    pub async fn search_groups(
        &self,
        filter: Option<&str>,
        start_index: Option<i64>,
        count: Option<i64>,
    ) -> MembershipResult<ScimListResponse<GroupResource>> {
        let url = format!("{}/Groups", self.base_url);
        self.get_with_params(&url, filter, start_index, count).await
    }

    // ── Internal HTTP methods ─────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: &str) -> MembershipResult<T> {
        debug!("SCIM GET {}", url);
        let builder = self.http_client.get(url);
        let builder = self.auth.apply(builder).await?;
        let response = builder.send().await?;
        self.handle_response(response).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        url: &str,
        filter: Option<&str>,
        start_index: Option<i64>,
        count: Option<i64>,
    ) -> MembershipResult<T> {
        debug!("SCIM GET {} (filter={:?})", url, filter);
        let mut builder = self.http_client.get(url);
        let mut query_params: Vec<(&str, String)> = Vec::new();
        if let Some(f) = filter {
            query_params.push(("filter", f.to_string()));
        }
        if let Some(si) = start_index {
            query_params.push(("startIndex", si.to_string()));
        }
        if let Some(c) = count {
            query_params.push(("count", c.to_string()));
        }
        if !query_params.is_empty() {
            builder = builder.query(&query_params);
        }
        let builder = self.auth.apply(builder).await?;
        let response = builder.send().await?;
        self.handle_response(response).await
    }

    async fn patch(&self, url: &str, patch: &ScimPatchRequest) -> MembershipResult<()> {
        debug!("SCIM PATCH {} ({} operations)", url, patch.operations.len());
        let builder = self.http_client.patch(url);
        let builder = self.auth.apply(builder).await?;
        let response = builder
            .header("Content-Type", "application/scim+json")
            .json(patch)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT || status.is_success() {
            Ok(())
        } else {
            self.handle_error_response(response).await
        }
    }

    // ── Response handling ─────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> MembershipResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            self.handle_error_response(response).await
        }
    }

    async fn handle_error_response<T>(&self, response: reqwest::Response) -> MembershipResult<T> {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        // Structured SCIM error bodies carry `detail` (or `description` on
        // older endpoints); anything else surfaces as unstructured.
        let detail = serde_json::from_str::<ScimErrorResponse>(&body)
            .ok()
            .and_then(|e| e.message());

        match status {
            StatusCode::NOT_FOUND => Err(MembershipError::NotFound { detail }),
            StatusCode::CONFLICT => Err(MembershipError::Conflict { detail }),
            StatusCode::UNAUTHORIZED => {
                // Invalidate a cached OAuth2 token on 401.
                self.auth.invalidate_cache().await;
                Err(MembershipError::AuthError(format!(
                    "Authentication failed (401): {}",
                    detail.unwrap_or(body)
                )))
            }
            _ => Err(MembershipError::ScimError {
                status: status.as_u16(),
                detail,
            }),
        }
    }
}
