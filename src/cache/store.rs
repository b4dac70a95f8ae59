//! Cache Store Module
//!
//! Thread-safe wrapper around [`LruCache`] with lazy initialization.

use parking_lot::Mutex;

use crate::cache::{ByteView, CacheStats, LruCache};

#[derive(Debug, Default)]
struct Inner {
    lru: Option<LruCache<ByteView>>,
    stats: CacheStats,
}

// == Cache ==
/// A byte-bounded LRU cache of [`ByteView`]s safe to share between threads.
///
/// Every operation runs under one mutex. The underlying store is only
/// allocated by the first [`add`](Cache::add); lookups on a cache that was
/// never written return `None` without allocating.
#[derive(Debug)]
pub struct Cache {
    max_bytes: usize,
    inner: Mutex<Inner>,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache bounded to `max_bytes` (0 = unbounded).
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            inner: Mutex::new(Inner::default()),
        }
    }

    // == Add ==
    /// Stores `value` under `key`, evicting cold entries as needed.
    pub fn add(&self, key: &str, value: ByteView) {
        let mut inner = self.inner.lock();
        let max_bytes = self.max_bytes;
        let lru = inner.lru.get_or_insert_with(|| LruCache::new(max_bytes));
        let evicted = lru.add(key, value);
        let (bytes, items) = (lru.bytes(), lru.len());
        inner.stats.record_evictions(evicted);
        inner.stats.set_occupancy(bytes, items);
    }

    // == Get ==
    /// Looks up `key`, promoting it to most recently used on a hit.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut inner = self.inner.lock();
        let value = inner.lru.as_mut().and_then(|lru| lru.get(key).cloned());
        inner.stats.record_get(value.is_some());
        value
    }

    // == Stats ==
    /// Returns a snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats.clone()
    }

    /// Returns true once the first `add` has allocated the underlying store.
    pub fn is_initialized(&self) -> bool {
        self.inner.lock().lru.is_some()
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_get_before_add_does_not_allocate() {
        let cache = Cache::new(1024);

        assert!(cache.get("missing").is_none());
        assert!(!cache.is_initialized());
        assert_eq!(cache.stats().gets, 1);
    }

    #[test]
    fn test_add_allocates_and_get_hits() {
        let cache = Cache::new(1024);
        cache.add("Tom", ByteView::from("630"));

        assert!(cache.is_initialized());
        assert_eq!(cache.get("Tom"), Some(ByteView::from("630")));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.items, 1);
        assert_eq!(stats.bytes, 6);
    }

    #[test]
    fn test_eviction_is_counted() {
        let cache = Cache::new(8);
        cache.add("k1", ByteView::from("v1"));
        cache.add("k2", ByteView::from("v2"));
        cache.add("k3", ByteView::from("v3"));

        assert!(cache.get("k1").is_none());
        let stats = cache.stats();
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.items, 2);
        assert!(stats.bytes <= 8);
    }

    #[test]
    fn test_concurrent_adds_respect_budget() {
        let cache = Arc::new(Cache::new(256));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..200 {
                        let key = format!("t{t}-k{i}");
                        cache.add(&key, ByteView::from(vec![b'x'; 10]));
                        cache.get(&key);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = cache.stats();
        assert!(stats.bytes <= 256);
        assert_eq!(stats.gets, 1600);
    }
}
