//! Snapshot lifecycle.
//!
//! A schedule refresh or date rollover produces a whole new `Planner`
//! over the new timetable; the store swaps the active reference
//! atomically. Queries grab the current `Arc` and keep using it for
//! their whole lifetime, so in-flight queries finish against the
//! snapshot they started with (single writer, many readers, no
//! coordination beyond the swap itself).

use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::planner::Planner;

/// Holds the active planning snapshot.
pub struct SnapshotStore {
    active: RwLock<Arc<Planner>>,
}

impl SnapshotStore {
    /// Create a store with an initial snapshot.
    pub fn new(initial: Planner) -> Self {
        Self {
            active: RwLock::new(Arc::new(initial)),
        }
    }

    /// Returns the active snapshot.
    pub fn current(&self) -> Arc<Planner> {
        self.active
            .read()
            .expect("snapshot lock poisoned")
            .clone()
    }

    /// Swap in a new snapshot, returning the previous one.
    pub fn replace(&self, next: Planner) -> Arc<Planner> {
        let mut guard = self.active.write().expect("snapshot lock poisoned");
        let previous = std::mem::replace(&mut *guard, Arc::new(next));
        debug!("snapshot replaced");
        previous
    }
}
