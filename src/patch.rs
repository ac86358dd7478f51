//! Patch builder — translates membership diffs into the SCIM patch
//! operations consumed by the backend's update endpoint.
//!
//! The backend batches additions into a single `add` operation carrying the
//! full member list, but requires one individually-scoped `remove` operation
//! per removed member.  This asymmetry is a backend contract constraint and
//! is preserved faithfully here.

use serde_json::{json, Value};

use crate::diff::MembershipDiff;
use crate::model::{ScimPatchOp, ScimPatchRequest};

/// Escape a value for use inside a SCIM filter string literal.
///
/// Per RFC 7644 Section 3.4.2.2, string values in filter expressions are
/// enclosed in double-quotes.  Backslashes and double-quotes are escaped to
/// prevent filter injection.
pub(crate) fn escape_filter_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Filter path addressing one member of a multi-valued attribute.
fn remove_path(attribute: &str, id: &str) -> String {
    format!("{attribute}[value eq \"{}\"]", escape_filter_value(id))
}

/// Build the operation list for one diff.
///
/// Emits all `remove` operations first (in removed order), then at most one
/// `add` operation bundling every added member as `{value, display}` pairs
/// under `attribute`.  Empty sides emit nothing; an empty diff yields an
/// empty list.
#[must_use]
pub fn build_operations(attribute: &str, diff: &MembershipDiff) -> Vec<ScimPatchOp> {
    let mut operations = Vec::with_capacity(diff.removed.len() + 1);

    for member in &diff.removed {
        operations.push(ScimPatchOp {
            op: "remove".to_string(),
            path: Some(remove_path(attribute, &member.id)),
            value: None,
        });
    }

    if !diff.added.is_empty() {
        let values: Vec<Value> = diff
            .added
            .iter()
            .map(|member| {
                if member.display.is_empty() {
                    json!({ "value": member.id })
                } else {
                    json!({ "value": member.id, "display": member.display })
                }
            })
            .collect();
        operations.push(ScimPatchOp {
            op: "add".to_string(),
            path: Some(attribute.to_string()),
            value: Some(Value::Array(values)),
        });
    }

    operations
}

/// Build one patch request from diffs spanning multiple partitions.
///
/// Per-partition operation lists are concatenated in the order given,
/// preserving each partition's internal remove-then-add ordering.  Returns
/// `None` when no partition has changes, in which case the submission must
/// be suppressed entirely.
#[must_use]
pub fn build_patch<'a, I>(attribute: &str, diffs: I) -> Option<ScimPatchRequest>
where
    I: IntoIterator<Item = &'a MembershipDiff>,
{
    let mut operations = Vec::new();
    for diff in diffs {
        operations.extend(build_operations(attribute, diff));
    }

    if operations.is_empty() {
        None
    } else {
        Some(ScimPatchRequest::new(operations))
    }
}
