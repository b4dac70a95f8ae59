//! Peer Cache - A peer-aware in-process caching layer
//!
//! Serves values for string keys from named groups, each holding a
//! byte-bounded LRU working set. On a miss, concurrent requests for a key
//! share one load, which asks the owning peer before falling back to the
//! group's local data source.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod models;
pub mod peers;
pub mod singleflight;
pub mod tasks;

pub use api::AppState;
pub use cache::ByteView;
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::{Getter, GetterFn, Group, Registry};
pub use peers::{HttpPool, PeerGetter, PeerPicker};
pub use tasks::spawn_stats_reporter;
