//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::group::{Group, GroupStatsSnapshot};

/// Response body for `GET /api/:group/:key`
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The group that served the value
    pub group: String,
    /// The requested key
    pub key: String,
    /// The value, decoded as UTF-8 (lossy)
    pub value: String,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(group: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Statistics of one group
#[derive(Debug, Clone, Serialize)]
pub struct GroupStatsResponse {
    /// Group name
    pub name: String,
    /// Byte budget of the main cache (0 = unbounded)
    pub cache_bytes: usize,
    /// Request routing counters
    pub group: GroupStatsSnapshot,
    /// Main cache counters
    pub main_cache: CacheStats,
    /// Main cache hit rate
    pub hit_rate: f64,
}

impl GroupStatsResponse {
    /// Captures the current counters of `group`
    pub fn from_group(group: &Group) -> Self {
        let main_cache = group.cache_stats();
        Self {
            name: group.name().to_string(),
            cache_bytes: group.cache_bytes(),
            group: group.stats(),
            hit_rate: main_cache.hit_rate(),
            main_cache,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// One entry per registered group, ordered by name
    pub groups: Vec<GroupStatsResponse>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
