//! Diff engine — minimal add/remove sets between two membership snapshots.
//!
//! Equality is `id`-only: two entries with the same `id` but different
//! display labels are the same member.  Output ordering is deterministic
//! because the patch builder emits operations in the order it receives them.

use std::collections::HashSet;

use crate::member::MemberRef;

/// Result of comparing a baseline snapshot against the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDiff {
    /// Members present in `current` but not in `baseline`, in `current` order.
    pub added: Vec<MemberRef>,
    /// Members present in `baseline` but not in `current`, in `baseline` order.
    pub removed: Vec<MemberRef>,
}

impl MembershipDiff {
    /// Whether the snapshots were identical by `id`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compute the minimal add/remove sets between `baseline` and `current`.
///
/// - `added` preserves the relative order of `current`; `removed` preserves
///   the relative order of `baseline`.
/// - Multiplicity is ignored: a duplicated `id` contributes one entry, at the
///   position of its first occurrence.
/// - Members whose `id` appears on both sides are unchanged and appear in
///   neither output, even if their display labels differ.
#[must_use]
pub fn diff(baseline: &[MemberRef], current: &[MemberRef]) -> MembershipDiff {
    let baseline_ids: HashSet<&str> = baseline.iter().map(|m| m.id.as_str()).collect();
    let current_ids: HashSet<&str> = current.iter().map(|m| m.id.as_str()).collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut added = Vec::new();
    for member in current {
        if !baseline_ids.contains(member.id.as_str()) && seen.insert(member.id.as_str()) {
            added.push(member.clone());
        }
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut removed = Vec::new();
    for member in baseline {
        if !current_ids.contains(member.id.as_str()) && seen.insert(member.id.as_str()) {
            removed.push(member.clone());
        }
    }

    MembershipDiff { added, removed }
}

/// [`diff`] over possibly-absent snapshots; an absent side is an empty set,
/// not an error.
#[must_use]
pub fn diff_opt(baseline: Option<&[MemberRef]>, current: Option<&[MemberRef]>) -> MembershipDiff {
    diff(baseline.unwrap_or(&[]), current.unwrap_or(&[]))
}
