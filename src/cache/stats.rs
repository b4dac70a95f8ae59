//! Cache Statistics Module
//!
//! Tracks the occupancy and hit counters of one [`Cache`](super::Cache).

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of a cache's counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Bytes accounted to live entries (key + value lengths)
    pub bytes: usize,
    /// Number of live entries
    pub items: usize,
    /// Number of lookups
    pub gets: u64,
    /// Number of lookups that found an entry
    pub hits: u64,
    /// Number of entries evicted to stay within the byte budget
    pub evictions: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / gets, or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        if self.gets == 0 {
            0.0
        } else {
            self.hits as f64 / self.gets as f64
        }
    }

    // == Record Lookup ==
    /// Counts one lookup and whether it hit.
    pub fn record_get(&mut self, hit: bool) {
        self.gets += 1;
        if hit {
            self.hits += 1;
        }
    }

    // == Record Evictions ==
    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    // == Occupancy ==
    /// Updates the byte and item totals.
    pub fn set_occupancy(&mut self, bytes: usize, items: usize) {
        self.bytes = bytes;
        self.items = items;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.gets, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.items, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_get(true);
        stats.record_get(false);
        stats.record_get(true);
        stats.record_get(false);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_record_evictions() {
        let mut stats = CacheStats::new();
        stats.record_evictions(2);
        stats.record_evictions(0);
        stats.record_evictions(1);
        assert_eq!(stats.evictions, 3);
    }

    #[test]
    fn test_serializes_counters() {
        let mut stats = CacheStats::new();
        stats.set_occupancy(42, 3);
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"bytes\":42"));
        assert!(json.contains("\"items\":3"));
    }
}
