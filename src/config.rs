//! SCIM backend configuration.

use serde::{Deserialize, Serialize};

use crate::auth::Credentials;

/// Configuration for one SCIM backend target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Base URL of the SCIM API (e.g., "<https://idp.example.com/scim2>").
    pub base_url: String,

    /// Credentials used to authenticate against the target.
    pub credentials: Credentials,

    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Whether to verify the target's TLS certificate.
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_tls_verify() -> bool {
    true
}

impl TargetConfig {
    /// Create a config with default timeout and TLS verification.
    #[must_use]
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            request_timeout_secs: default_request_timeout_secs(),
            tls_verify: default_tls_verify(),
        }
    }
}
