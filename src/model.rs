//! SCIM 2.0 wire models (RFC 7643/7644 subset used by membership editing).

use serde::{Deserialize, Serialize};

use crate::member::{MemberKind, MemberRef};

/// SCIM PATCH operation (RFC 7644 Section 3.5.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimPatchOp {
    /// Operation type: add, remove, or replace.
    pub op: String,

    /// Attribute path (e.g., "members", "users[value eq \"123\"]").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Value to set (for add/replace operations).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

/// SCIM PATCH request (RFC 7644 Section 3.5.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimPatchRequest {
    /// SCIM schemas.
    pub schemas: Vec<String>,

    /// Operations to perform, applied in order.
    #[serde(rename = "Operations")]
    pub operations: Vec<ScimPatchOp>,
}

impl ScimPatchRequest {
    /// SCIM Patch Operation schema URI.
    pub const SCHEMA: &'static str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

    /// Create a patch request carrying the PatchOp schema.
    #[must_use]
    pub fn new(operations: Vec<ScimPatchOp>) -> Self {
        Self {
            schemas: vec![Self::SCHEMA.to_string()],
            operations,
        }
    }

    /// Validate the patch request shape before sending.
    pub fn validate(&self) -> Result<(), String> {
        if !self.schemas.contains(&Self::SCHEMA.to_string()) {
            return Err("Missing PatchOp schema".to_string());
        }

        for (i, op) in self.operations.iter().enumerate() {
            let op_lower = op.op.to_lowercase();
            if !["add", "remove", "replace"].contains(&op_lower.as_str()) {
                return Err(format!("Invalid operation '{}' at index {}", op.op, i));
            }
            if op_lower == "remove" && op.path.is_none() {
                return Err(format!("Remove operation at index {i} requires a path"));
            }
            if (op_lower == "add" || op_lower == "replace") && op.value.is_none() {
                return Err(format!(
                    "Operation '{}' at index {} requires a value",
                    op.op, i
                ));
            }
        }

        Ok(())
    }
}

/// Entry of a multi-valued membership attribute (`{value: id, display: label}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberValue {
    /// Id of the referenced resource.
    pub value: String,

    /// Display label of the referenced resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    /// URI of the referenced resource.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl MemberValue {
    /// Resolve into the normalized member shape used by the reconciliation
    /// core.
    #[must_use]
    pub fn to_ref(&self, kind: MemberKind) -> MemberRef {
        MemberRef {
            kind,
            id: self.value.clone(),
            display: self.display.clone().unwrap_or_default(),
        }
    }
}

/// SCIM List Response (RFC 7644 Section 3.4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimListResponse<T> {
    /// SCIM schemas.
    #[serde(default)]
    pub schemas: Vec<String>,

    /// Total number of results matching the query.
    pub total_results: i64,

    /// 1-based index of the first result in this page.
    #[serde(default)]
    pub start_index: i64,

    /// Number of items per page.
    #[serde(default)]
    pub items_per_page: i64,

    /// The resources in this page.
    #[serde(rename = "Resources", default = "Vec::new")]
    pub resources: Vec<T>,
}

/// Group resource as returned by `GET /Groups/{id}` and group searches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResource {
    #[serde(default)]
    pub schemas: Vec<String>,
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    /// Current membership list used to populate the baseline.
    #[serde(default)]
    pub members: Vec<MemberValue>,
}

impl GroupResource {
    /// Members of this group as normalized user references.
    #[must_use]
    pub fn member_refs(&self) -> Vec<MemberRef> {
        self.members
            .iter()
            .map(|m| m.to_ref(MemberKind::User))
            .collect()
    }

    /// This group as a selectable candidate.
    #[must_use]
    pub fn to_ref(&self) -> MemberRef {
        MemberRef::group(self.id.clone(), self.display_name.clone())
    }
}

/// Role resource as returned by `GET /Roles/{id}` — carries both user and
/// group membership attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResource {
    #[serde(default)]
    pub schemas: Vec<String>,
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub users: Vec<MemberValue>,
    #[serde(default)]
    pub groups: Vec<MemberValue>,
}

impl RoleResource {
    /// Users assigned to this role as normalized references.
    #[must_use]
    pub fn user_refs(&self) -> Vec<MemberRef> {
        self.users
            .iter()
            .map(|m| m.to_ref(MemberKind::User))
            .collect()
    }

    /// Groups assigned to this role as normalized references.
    #[must_use]
    pub fn group_refs(&self) -> Vec<MemberRef> {
        self.groups
            .iter()
            .map(|m| m.to_ref(MemberKind::Group))
            .collect()
    }
}

/// User resource as returned by user searches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResource {
    #[serde(default)]
    pub schemas: Vec<String>,
    pub id: String,
    pub user_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl UserResource {
    /// This user as a selectable candidate; falls back to the user name when
    /// no display name is set.
    #[must_use]
    pub fn to_ref(&self) -> MemberRef {
        let display = self
            .display_name
            .clone()
            .unwrap_or_else(|| self.user_name.clone());
        MemberRef::user(self.id.clone(), display)
    }
}

/// SCIM error response body (RFC 7644 Section 3.12).
///
/// Older endpoints report `description` instead of `detail`; both are
/// accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimErrorResponse {
    #[serde(default)]
    pub schemas: Vec<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ScimErrorResponse {
    /// The structured message to surface, preferring `detail` over
    /// `description`.  `None` when the body carried neither.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.detail
            .clone()
            .or_else(|| self.description.clone())
            .filter(|m| !m.is_empty())
    }
}
