//! Submission controller — drives the end-to-end membership update.
//!
//! Flattens the tracker's per-partition diffs, builds the patch document,
//! submits it, and reports the outcome through an injected notification
//! sink.  At most one submission may be in flight per editing session.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::client::ScimClient;
use crate::error::{MembershipError, MembershipResult};
use crate::patch::build_patch;
use crate::selection::SelectionTracker;

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Success,
    Error,
}

/// Sink for user-visible notifications.
///
/// Injected into the controller rather than reached through a global store,
/// so callers decide how alerts are rendered.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: AlertLevel, message: &str);
}

/// Kind of resource whose membership attribute is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Group,
    Role,
}

/// Target of a membership submission.
#[derive(Debug, Clone)]
pub struct SubmitTarget {
    pub resource: ResourceKind,
    /// SCIM id of the resource being edited.
    pub id: String,
    /// Membership attribute being patched ("members", "users", "groups").
    pub attribute: String,
}

impl SubmitTarget {
    /// Target a group's `members` attribute.
    #[must_use]
    pub fn group_members(id: impl Into<String>) -> Self {
        Self {
            resource: ResourceKind::Group,
            id: id.into(),
            attribute: "members".to_string(),
        }
    }

    /// Target a role's `users` attribute.
    #[must_use]
    pub fn role_users(id: impl Into<String>) -> Self {
        Self {
            resource: ResourceKind::Role,
            id: id.into(),
            attribute: "users".to_string(),
        }
    }

    /// Target a role's `groups` attribute.
    #[must_use]
    pub fn role_groups(id: impl Into<String>) -> Self {
        Self {
            resource: ResourceKind::Role,
            id: id.into(),
            attribute: "groups".to_string(),
        }
    }
}

/// Outcome of a submit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The patch was sent and acknowledged by the target.
    Submitted,
    /// Baseline and current selections were identical; no request was sent.
    NoChanges,
}

const SUCCESS_MESSAGE: &str = "Membership assignments updated successfully.";

/// Drives membership submissions for one editing session.
///
/// The single-flight guard is shared across clones, so every handle to the
/// session observes an in-flight submission.
#[derive(Clone, Default)]
pub struct SubmissionController {
    in_flight: Arc<AtomicBool>,
    on_updated: Option<Arc<dyn Fn(&str) + Send + Sync>>,
}

impl fmt::Debug for SubmissionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionController")
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl SubmissionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked with the resource id after a successful
    /// submission, typically to refetch the entity and rebuild the baseline.
    #[must_use]
    pub fn on_updated(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_updated = Some(Arc::new(callback));
        self
    }

    /// Whether a submission is currently in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Submit the tracker's pending changes to `target`.
    ///
    /// - Returns [`SubmitOutcome::NoChanges`] without touching the network
    ///   when every partition's current selection equals its baseline.
    /// - Fails with [`MembershipError::SubmissionInFlight`] if another
    ///   submission for this session has not completed.
    /// - On failure the tracker is left untouched so the operator can
    ///   resubmit; the error's structured detail (when present) is surfaced
    ///   verbatim through `notifier`.
    pub async fn submit(
        &self,
        client: &ScimClient,
        target: &SubmitTarget,
        tracker: &SelectionTracker,
        notifier: &dyn Notifier,
    ) -> MembershipResult<SubmitOutcome> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(MembershipError::SubmissionInFlight);
        }
        let guard = InFlightGuard {
            flag: self.in_flight.as_ref(),
        };

        let diffs = tracker.diff_all();
        let Some(patch) = build_patch(&target.attribute, diffs.iter().map(|(_, d)| d)) else {
            debug!(resource_id = %target.id, "No membership changes; skipping submission");
            return Ok(SubmitOutcome::NoChanges);
        };

        let result = match target.resource {
            ResourceKind::Group => client.patch_group(&target.id, &patch).await,
            ResourceKind::Role => client.patch_role(&target.id, &patch).await,
        };
        drop(guard);

        match result {
            Ok(()) => {
                info!(
                    resource_id = %target.id,
                    attribute = %target.attribute,
                    operations = patch.operations.len(),
                    "Membership update submitted"
                );
                notifier.notify(AlertLevel::Success, SUCCESS_MESSAGE);
                if let Some(callback) = &self.on_updated {
                    callback(&target.id);
                }
                Ok(SubmitOutcome::Submitted)
            }
            Err(error) => {
                warn!(
                    resource_id = %target.id,
                    attribute = %target.attribute,
                    error = %error,
                    "Membership update failed"
                );
                notifier.notify(AlertLevel::Error, &error.user_message());
                Err(error)
            }
        }
    }
}

/// Clears the in-flight flag on every exit path, including early returns.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_targets() {
        let target = SubmitTarget::group_members("g1");
        assert_eq!(target.resource, ResourceKind::Group);
        assert_eq!(target.attribute, "members");

        let target = SubmitTarget::role_users("r1");
        assert_eq!(target.resource, ResourceKind::Role);
        assert_eq!(target.attribute, "users");

        let target = SubmitTarget::role_groups("r1");
        assert_eq!(target.attribute, "groups");
    }

    #[test]
    fn test_controller_starts_idle() {
        let controller = SubmissionController::new();
        assert!(!controller.is_submitting());
    }

    #[test]
    fn test_clones_share_the_guard() {
        let controller = SubmissionController::new();
        let clone = controller.clone();

        controller.in_flight.store(true, Ordering::SeqCst);
        assert!(clone.is_submitting());
    }
}
