//! Normalized member identity used across the selection, diff, and patch
//! stages.
//!
//! Mixed user/group shapes coming from the API are resolved into a single
//! tagged [`MemberRef`] at the client boundary, so every later stage operates
//! on one shape keyed by `id`.

use serde::{Deserialize, Serialize};

/// Kind of entity participating in a membership relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    User,
    Group,
}

/// Minimal identity + label record for a user or group.
///
/// `id` is the sole identity key.  `display` is presentation-only and never
/// participates in set-membership decisions made by the diff or selection
/// layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRef {
    pub kind: MemberKind,
    pub id: String,
    pub display: String,
}

impl MemberRef {
    /// Create a user reference.
    #[must_use]
    pub fn user(id: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            kind: MemberKind::User,
            id: id.into(),
            display: display.into(),
        }
    }

    /// Create a group reference.
    #[must_use]
    pub fn group(id: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            kind: MemberKind::Group,
            id: id.into(),
            display: display.into(),
        }
    }
}
