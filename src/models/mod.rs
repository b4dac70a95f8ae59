//! Response models for the cache server API
//!
//! DTOs serialized into HTTP response bodies.

pub mod responses;

// Re-export commonly used types
pub use responses::{ErrorResponse, GetResponse, GroupStatsResponse, HealthResponse, StatsResponse};
