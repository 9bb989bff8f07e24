//! Run-scoped merge context: the dedup set and counters.

use std::collections::HashSet;

use super::entry::{Entry, Retention};

/// Decision for one entry offered to the write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// Write the entry to the destination.
    Forward,
    /// Expired or too short-lived; counted, never written, and never added
    /// to the dedup set.
    SkipExpired,
    /// Already written from an earlier source (or earlier in this source);
    /// counted, not written.
    SkipDuplicate,
}

/// Exact, monotonically increasing totals for one multi-source run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    /// Keys observed by the scanners across all sources.
    pub scanned: u64,
    /// Entries encoded into destination writes.
    pub merged: u64,
    /// Entries skipped by the retention policy.
    pub expired_skipped: u64,
    /// Entries skipped because the key was already written.
    pub duplicate_skipped: u64,
}

/// Shared state for one multi-source run.
///
/// Owned by the orchestrator for the lifetime of the run and threaded by
/// `&mut` through the accept path, so the check-then-insert on the dedup set
/// is atomic by construction. The set spans all sources: once a key has been
/// accepted from any source it is never written again, even if a later
/// source carries a different value - first writer wins, which makes the
/// configured source order significant.
#[derive(Debug, Default)]
pub struct MergeContext {
    seen: HashSet<String>,
    /// Running totals, reported after each source and at the end of the run.
    pub counters: Counters,
}

impl MergeContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether an entry is written, in order: retention first, then
    /// the dedup set, then insert-and-forward.
    ///
    /// An expired entry does not claim its key: a later source holding a
    /// durable copy of the same key may still win it.
    pub fn accept(&mut self, entry: &Entry) -> Acceptance {
        if entry.retention == Retention::Expire {
            self.counters.expired_skipped += 1;
            return Acceptance::SkipExpired;
        }
        if self.seen.contains(&entry.key) {
            self.counters.duplicate_skipped += 1;
            return Acceptance::SkipDuplicate;
        }
        self.seen.insert(entry.key.clone());
        Acceptance::Forward
    }

    /// Number of distinct keys accepted so far.
    pub fn accepted_keys(&self) -> usize {
        self.seen.len()
    }
}
