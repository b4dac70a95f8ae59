//! Cache Module
//!
//! Byte-bounded LRU storage: the unsynchronized [`LruCache`], the immutable
//! [`ByteView`] values it holds, and the thread-safe [`Cache`] wrapper.

mod byteview;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use byteview::ByteView;
pub use lru::{ByteSize, Iter, LruCache, OnEvicted};
pub use stats::CacheStats;
pub use store::Cache;
