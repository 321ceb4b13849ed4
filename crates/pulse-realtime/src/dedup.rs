//! Bounded id sets for per-session deduplication.

use std::collections::HashSet;

use uuid::Uuid;

/// A fixed-capacity id set with clear-on-overflow eviction.
///
/// Ephemeral per-session state, not a source of truth: losing the contents
/// on overflow only risks re-showing a toast, which the idempotent
/// mark-read path tolerates.
#[derive(Debug)]
pub struct BoundedIdSet {
    capacity: usize,
    ids: HashSet<Uuid>,
}

impl BoundedIdSet {
    /// Create a set that clears itself once it exceeds `capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            ids: HashSet::new(),
        }
    }

    /// Insert an id. Returns `true` if it was not already present.
    pub fn insert(&mut self, id: Uuid) -> bool {
        if self.ids.len() > self.capacity {
            self.ids.clear();
        }
        self.ids.insert(id)
    }

    /// Whether the id is currently tracked.
    pub fn contains(&self, id: &Uuid) -> bool {
        self.ids.contains(id)
    }

    /// Number of tracked ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
