//! Authentication against the SCIM backend: static Bearer token and OAuth2
//! client credentials.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{MembershipError, MembershipResult};

/// Refresh OAuth2 tokens this long before their reported expiry, so a token
/// cannot lapse mid-request.
const TOKEN_EXPIRY_SKEW_SECS: u64 = 30;

/// Credentials for the SCIM backend.
///
/// The [`Debug`] impl redacts tokens and secrets to prevent accidental
/// credential exposure in log output.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Credentials {
    /// Static Bearer token.
    #[serde(rename = "bearer")]
    Bearer { token: String },

    /// OAuth2 client credentials grant.
    #[serde(rename = "oauth2")]
    OAuth2 {
        client_id: String,
        client_secret: String,
        token_endpoint: String,
        #[serde(default)]
        scopes: Vec<String>,
    },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"[REDACTED]")
                .finish(),
            Self::OAuth2 {
                client_id,
                token_endpoint,
                scopes,
                ..
            } => f
                .debug_struct("OAuth2")
                .field("client_id", client_id)
                .field("client_secret", &"[REDACTED]")
                .field("token_endpoint", token_endpoint)
                .field("scopes", scopes)
                .finish(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Option<Instant>,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() >= exp)
    }
}

/// Applies authentication to outbound SCIM requests.
///
/// OAuth2 access tokens are cached (shared across clones) and refreshed
/// shortly before expiry.
#[derive(Debug, Clone)]
pub struct Authenticator {
    credentials: Credentials,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client used for token endpoint requests.
    http_client: reqwest::Client,
}

impl Authenticator {
    #[must_use]
    pub fn new(credentials: Credentials, http_client: reqwest::Client) -> Self {
        Self {
            credentials,
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// The Bearer token to use for the next request.
    ///
    /// Static for Bearer credentials; for OAuth2 client credentials, served
    /// from the cache while valid and fetched from the token endpoint
    /// otherwise.
    pub async fn bearer_token(&self) -> MembershipResult<String> {
        match &self.credentials {
            Credentials::Bearer { token } => Ok(token.clone()),
            Credentials::OAuth2 { .. } => {
                if let Some(token) = self.cached().await {
                    return Ok(token);
                }
                self.fetch_and_cache().await
            }
        }
    }

    /// The cached access token, unless absent or expired.
    async fn cached(&self) -> Option<String> {
        let cache = self.cached_token.read().await;
        cache
            .as_ref()
            .filter(|cached| !cached.is_expired())
            .map(|cached| cached.access_token.clone())
    }

    /// Run the client-credentials grant and cache the resulting token.
    async fn fetch_and_cache(&self) -> MembershipResult<String> {
        let Credentials::OAuth2 {
            client_id,
            client_secret,
            token_endpoint,
            scopes,
        } = &self.credentials
        else {
            return Err(MembershipError::AuthError(
                "Token fetch requires OAuth2 credentials".to_string(),
            ));
        };

        debug!("Fetching OAuth2 access token from {}", token_endpoint);
        let scope = scopes.join(" ");
        let mut form = vec![("grant_type", "client_credentials")];
        if !scope.is_empty() {
            form.push(("scope", scope.as_str()));
        }

        let response = self
            .http_client
            .post(token_endpoint)
            .basic_auth(client_id, Some(client_secret))
            .form(&form)
            .send()
            .await
            .map_err(|e| MembershipError::AuthError(format!("Token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MembershipError::AuthError(format!(
                "Token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            MembershipError::AuthError(format!("Failed to parse token response: {e}"))
        })?;

        let expires_at = token.expires_in.map(|secs| {
            Instant::now() + Duration::from_secs(secs.saturating_sub(TOKEN_EXPIRY_SKEW_SECS))
        });

        {
            let mut cache = self.cached_token.write().await;
            *cache = Some(CachedToken {
                access_token: token.access_token.clone(),
                expires_at,
            });
        }

        Ok(token.access_token)
    }

    /// Apply authentication to a request builder.
    pub async fn apply(&self, builder: RequestBuilder) -> MembershipResult<RequestBuilder> {
        let token = self.bearer_token().await?;
        Ok(builder.bearer_auth(token))
    }

    /// Invalidate the cached OAuth2 token (e.g., after a 401 response).
    pub async fn invalidate_cache(&self) {
        let mut cache = self.cached_token.write().await;
        *cache = None;
    }
}
