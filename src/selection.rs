//! Selection tracker — per-partition baseline and in-progress member
//! selections for one editing session.
//!
//! A partition is an independent membership bucket ("LOCAL" groups, an
//! identity-provider id, a user-store domain).  Partitions do not overlap:
//! a member belongs to exactly one partition's baseline at a time.  All
//! state is in-memory and owned by the editor session; it is discarded when
//! the session ends.

use std::collections::{HashMap, HashSet};

use crate::diff::{diff, MembershipDiff};
use crate::member::MemberRef;

#[derive(Debug, Clone, Default)]
struct PartitionState {
    /// What the backend currently records as assigned.  Immutable for the
    /// life of the edit session; replaced only by reloading the baseline.
    baseline: Vec<MemberRef>,
    /// Pending selections, initialized from the baseline.
    current: Vec<MemberRef>,
}

/// Tracks per-partition membership selections against loaded baselines.
///
/// Partition iteration order is the order in which partitions were first
/// touched, which keeps multi-partition submissions deterministic.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    partitions: Vec<(String, PartitionState)>,
}

impl SelectionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self, partition: &str) -> Option<&PartitionState> {
        self.partitions
            .iter()
            .find(|(name, _)| name == partition)
            .map(|(_, state)| state)
    }

    fn state_mut(&mut self, partition: &str) -> &mut PartitionState {
        let idx = self
            .partitions
            .iter()
            .position(|(name, _)| name == partition);
        match idx {
            Some(idx) => &mut self.partitions[idx].1,
            None => {
                self.partitions
                    .push((partition.to_string(), PartitionState::default()));
                &mut self.partitions.last_mut().expect("just pushed").1
            }
        }
    }

    /// Install the server-confirmed baseline for `partition` and initialize
    /// the current selection as a copy of it.  Duplicate ids are collapsed,
    /// keeping the last-seen entry.
    pub fn load_baseline(&mut self, partition: &str, members: Vec<MemberRef>) {
        let members = dedupe_by_id(members);
        let state = self.state_mut(partition);
        state.current = members.clone();
        state.baseline = members;
    }

    /// Replace the current selection for `partition`.  Duplicate ids are
    /// collapsed, keeping the last-seen entry at its first position.
    pub fn set_current(&mut self, partition: &str, members: Vec<MemberRef>) {
        self.state_mut(partition).current = dedupe_by_id(members);
    }

    /// The baseline for `partition`; empty if the partition is unknown.
    #[must_use]
    pub fn baseline(&self, partition: &str) -> &[MemberRef] {
        self.state(partition).map_or(&[], |s| s.baseline.as_slice())
    }

    /// The current selection for `partition`; empty if the partition is
    /// unknown.
    #[must_use]
    pub fn current(&self, partition: &str) -> &[MemberRef] {
        self.state(partition).map_or(&[], |s| s.current.as_slice())
    }

    /// Members removed so far: `baseline \ current` by id, in baseline
    /// insertion order.
    #[must_use]
    pub fn removed(&self, partition: &str) -> Vec<MemberRef> {
        diff(self.baseline(partition), self.current(partition)).removed
    }

    /// Undo removals: re-add the subset of `members` that is currently in
    /// [`removed`](Self::removed), in the order given.  Entries that are not
    /// pending removal are silently ignored.
    pub fn restore(&mut self, partition: &str, members: &[MemberRef]) {
        let removed = self.removed(partition);
        let removed_ids: HashSet<&str> = removed.iter().map(|m| m.id.as_str()).collect();

        let state = self.state_mut(partition);
        let mut current_ids: HashSet<String> =
            state.current.iter().map(|m| m.id.clone()).collect();
        for member in members {
            if removed_ids.contains(member.id.as_str()) && current_ids.insert(member.id.clone()) {
                state.current.push(member.clone());
            }
        }
    }

    /// Cancel pending edits for `partition`: current := baseline.
    pub fn reset(&mut self, partition: &str) {
        let state = self.state_mut(partition);
        state.current = state.baseline.clone();
    }

    /// Partition names in first-touched order.
    pub fn partitions(&self) -> impl Iterator<Item = &str> {
        self.partitions.iter().map(|(name, _)| name.as_str())
    }

    /// Per-partition diffs in first-touched partition order.
    #[must_use]
    pub fn diff_all(&self) -> Vec<(String, MembershipDiff)> {
        self.partitions
            .iter()
            .map(|(name, state)| (name.clone(), diff(&state.baseline, &state.current)))
            .collect()
    }

    /// Whether any partition has pending changes.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.partitions
            .iter()
            .any(|(_, state)| !diff(&state.baseline, &state.current).is_empty())
    }
}

/// Collapse duplicate ids, keeping the last-seen entry at the position of
/// the id's first occurrence.
fn dedupe_by_id(members: Vec<MemberRef>) -> Vec<MemberRef> {
    let mut out: Vec<MemberRef> = Vec::with_capacity(members.len());
    let mut index: HashMap<String, usize> = HashMap::new();
    for member in members {
        match index.get(member.id.as_str()) {
            Some(&i) => out[i] = member,
            None => {
                index.insert(member.id.clone(), out.len());
                out.push(member);
            }
        }
    }
    out
}
