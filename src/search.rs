//! Latest-wins candidate lookup for member selection.
//!
//! Debounced search inputs issue overlapping queries; only the newest one
//! may deliver results.  A generation counter invalidates stale in-flight
//! lookups: a superseded query resolves to `Ok(None)` instead of delivering
//! results that would overwrite a newer query's.  This is external to the
//! reconciliation core and never touches the selection tracker.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::client::ScimClient;
use crate::error::MembershipResult;
use crate::member::{MemberKind, MemberRef};
use crate::patch::escape_filter_value;

/// Issues candidate-member lookups with latest-wins semantics.
///
/// Clones share the generation counter, so a lookup started through one
/// handle is invalidated by a newer lookup (or [`cancel`](Self::cancel))
/// through any other.
#[derive(Debug, Clone, Default)]
pub struct CandidateSearch {
    generation: Arc<AtomicU64>,
}

impl CandidateSearch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate any in-flight lookup without issuing a new one.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Search candidate members of `kind` matching `query`.
    ///
    /// Returns `Ok(None)` when a newer lookup was issued while this one was
    /// in flight.  An empty query lists without a filter.
    pub async fn search(
        &self,
        client: &ScimClient,
        kind: MemberKind,
        query: &str,
        count: i64,
    ) -> MembershipResult<Option<Vec<MemberRef>>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let filter = candidate_filter(kind, query);

        let refs: Vec<MemberRef> = match kind {
            MemberKind::User => {
                let response = client
                    .search_users(filter.as_deref(), None, Some(count))
                    .await?;
                response.resources.iter().map(|u| u.to_ref()).collect()
            }
            MemberKind::Group => {
                let response = client
                    .search_groups(filter.as_deref(), None, Some(count))
                    .await?;
                response.resources.iter().map(|g| g.to_ref()).collect()
            }
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(query, "Discarding stale candidate lookup");
            return Ok(None);
        }

        Ok(Some(refs))
    }
}

/// Build the SCIM filter for a candidate query, or `None` for an empty
/// query (unfiltered listing).
fn candidate_filter(kind: MemberKind, query: &str) -> Option<String> {
    if query.is_empty() {
        return None;
    }
    let escaped = escape_filter_value(query);
    Some(match kind {
        MemberKind::User => format!("userName co \"{escaped}\""),
        MemberKind::Group => format!("displayName co \"{escaped}\""),
    })
}
