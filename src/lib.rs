//! Membership reconciliation core for IAM admin tooling.
//!
//! Compares a server-confirmed baseline of role/group/user assignments
//! against in-progress selections, computes the minimal add/remove delta,
//! and shapes it into the SCIM 2.0 patch document consumed by the identity
//! backend.  The same diff-and-patch pipeline serves role→user, role→group,
//! and group→member editing.
//!
//! The pipeline has three pure stages plus one external-facing orchestrator:
//!
//! - [`selection::SelectionTracker`] holds per-partition baseline/current
//!   selections while the operator edits.
//! - [`diff::diff`] computes the added/removed sets by id, with
//!   deterministic ordering.
//! - [`patch::build_patch`] serializes the delta into the wire-level
//!   operation list (individually scoped removes, one batched add).
//! - [`submit::SubmissionController`] sends the patch through
//!   [`client::ScimClient`] and reports the outcome, guarding against
//!   concurrent submissions for the same session.

pub mod auth;
pub mod client;
pub mod config;
pub mod diff;
pub mod error;
pub mod member;
pub mod model;
pub mod patch;
pub mod search;
pub mod selection;
pub mod submit;

pub use client::ScimClient;
pub use config::TargetConfig;
pub use diff::{diff, diff_opt, MembershipDiff};
pub use error::{MembershipError, MembershipResult, GENERIC_FAILURE_MESSAGE};
pub use member::{MemberKind, MemberRef};
pub use patch::{build_operations, build_patch};
pub use search::CandidateSearch;
pub use selection::SelectionTracker;
pub use submit::{
    AlertLevel, Notifier, ResourceKind, SubmissionController, SubmitOutcome, SubmitTarget,
};
