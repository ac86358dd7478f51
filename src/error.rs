//! Error types for membership reconciliation and SCIM submission.

use thiserror::Error;

/// Fallback shown when the backend rejected a submission without a
/// structured error body.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Failed to update membership assignments. Please try again.";

/// Errors from the SCIM client and submission controller.
///
/// The diff engine, patch builder, and selection tracker are pure data
/// transforms and never produce errors.
#[derive(Debug, Error)]
pub enum MembershipError {
    /// Invalid client or target configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Authentication against the SCIM target failed.
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// HTTP transport error (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Resource not found (404).
    #[error("Resource not found: {}", .detail.as_deref().unwrap_or("<no detail>"))]
    NotFound { detail: Option<String> },

    /// Conflicting resource state (409).
    #[error("Conflict: {}", .detail.as_deref().unwrap_or("<no detail>"))]
    Conflict { detail: Option<String> },

    /// The target rejected the request with a SCIM error response.
    #[error("SCIM target returned HTTP {status}: {}", .detail.as_deref().unwrap_or("<no detail>"))]
    ScimError { status: u16, detail: Option<String> },

    /// A submission is already in flight for this editing session.
    #[error("A membership submission is already in flight for this session")]
    SubmissionInFlight,

    /// A success response body could not be deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MembershipError {
    /// Whether this error is a 404 from the target.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether the target failed server-side (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ScimError { status, .. } if *status >= 500)
    }

    /// Message to surface to the operator: the backend's structured
    /// `detail`/`description` verbatim when present, otherwise the generic
    /// fallback.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { detail }
            | Self::Conflict { detail }
            | Self::ScimError { detail, .. } => detail
                .clone()
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Result type for membership operations.
pub type MembershipResult<T> = Result<T, MembershipError>;
