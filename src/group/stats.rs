//! Group Statistics Module
//!
//! Lock-free counters describing how a group served its requests.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Group Stats ==
/// Per-group counters, updated without locking.
#[derive(Debug, Default)]
pub struct GroupStats {
    /// Calls to `Group::get` with a non-empty key
    pub gets: AtomicU64,
    /// Gets served from the main cache
    pub cache_hits: AtomicU64,
    /// Values fetched from a remote peer
    pub peer_loads: AtomicU64,
    /// Remote fetches that failed and fell back to the local source
    pub peer_errors: AtomicU64,
    /// Cache misses (before deduplication)
    pub loads: AtomicU64,
    /// Loads whose computation actually ran (callers that joined an
    /// in-flight load are not counted)
    pub loads_executed: AtomicU64,
    /// Successful local data source calls
    pub local_loads: AtomicU64,
    /// Failed local data source calls
    pub local_load_errors: AtomicU64,
}

impl GroupStats {
    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Copies the current counter values.
    pub fn snapshot(&self) -> GroupStatsSnapshot {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        GroupStatsSnapshot {
            gets: load(&self.gets),
            cache_hits: load(&self.cache_hits),
            peer_loads: load(&self.peer_loads),
            peer_errors: load(&self.peer_errors),
            loads: load(&self.loads),
            loads_executed: load(&self.loads_executed),
            local_loads: load(&self.local_loads),
            local_load_errors: load(&self.local_load_errors),
        }
    }
}

/// Point-in-time copy of [`GroupStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupStatsSnapshot {
    pub gets: u64,
    pub cache_hits: u64,
    pub peer_loads: u64,
    pub peer_errors: u64,
    pub loads: u64,
    pub loads_executed: u64,
    pub local_loads: u64,
    pub local_load_errors: u64,
}
