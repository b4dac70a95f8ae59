//! LRU Cache Module
//!
//! Byte-bounded Least Recently Used store.
//!
//! Entries live in a `Vec` arena linked into a doubly-linked recency list by
//! index; a `HashMap` maps each key to its arena slot. Get, add and evict are
//! O(1) amortized. The store takes no locks; see [`Cache`](super::Cache) for
//! the synchronized wrapper.

use std::collections::HashMap;
use std::fmt;

/// Null link in the recency list.
const NIL: usize = usize::MAX;

// == Byte Size ==
/// Values stored in an [`LruCache`] report how many bytes they occupy.
pub trait ByteSize {
    fn byte_size(&self) -> usize;
}

impl ByteSize for Vec<u8> {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl ByteSize for String {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

/// Callback invoked with each evicted entry.
///
/// It runs while the owner of the store holds whatever lock guards it, so it
/// must not block for long and must not call back into the same store.
pub type OnEvicted<V> = Box<dyn FnMut(String, V) + Send>;

#[derive(Debug)]
struct Node<V> {
    key: String,
    value: Option<V>,
    prev: usize,
    next: usize,
}

// == LRU Cache ==
/// A byte-bounded LRU store.
///
/// The running total counts `key.len() + value.byte_size()` for every live
/// entry. After each [`add`](LruCache::add) the total is at most `max_bytes`;
/// a `max_bytes` of zero disables eviction.
///
/// List order: head = most recently used, tail = least recently used.
pub struct LruCache<V> {
    max_bytes: usize,
    nbytes: usize,
    map: HashMap<String, usize>,
    arena: Vec<Node<V>>,
    head: usize,
    tail: usize,
    free_head: usize,
    on_evicted: Option<OnEvicted<V>>,
}

impl<V> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("max_bytes", &self.max_bytes)
            .field("nbytes", &self.nbytes)
            .field("len", &self.map.len())
            .finish()
    }
}

impl<V: ByteSize> LruCache<V> {
    // == Constructor ==
    /// Creates an empty store holding at most `max_bytes` bytes (0 = unbounded).
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            nbytes: 0,
            map: HashMap::new(),
            arena: Vec::new(),
            head: NIL,
            tail: NIL,
            free_head: NIL,
            on_evicted: None,
        }
    }

    /// Creates an empty store that reports evicted entries to `on_evicted`.
    pub fn with_eviction_callback(max_bytes: usize, on_evicted: OnEvicted<V>) -> Self {
        let mut cache = Self::new(max_bytes);
        cache.on_evicted = Some(on_evicted);
        cache
    }

    // == Get ==
    /// Looks up `key`, promoting it to most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.move_to_head(idx);
        self.arena[idx].value.as_ref()
    }

    /// Looks up `key` without touching the recency order.
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.map
            .get(key)
            .and_then(|&idx| self.arena[idx].value.as_ref())
    }

    // == Add ==
    /// Inserts or replaces `key`, making it the most recently used entry,
    /// then evicts from the cold end until the byte budget holds.
    ///
    /// An entry larger than the whole budget is evicted immediately after
    /// insertion. Returns the number of entries evicted.
    pub fn add(&mut self, key: &str, value: V) -> usize {
        if let Some(&idx) = self.map.get(key) {
            self.move_to_head(idx);
            let new_size = value.byte_size();
            let old = self.arena[idx].value.replace(value);
            let old_size = old.map_or(0, |v| v.byte_size());
            self.nbytes = self.nbytes - old_size + new_size;
        } else {
            self.nbytes += key.len() + value.byte_size();
            let idx = self.alloc_slot(key.to_string(), value);
            self.push_head(idx);
            self.map.insert(key.to_string(), idx);
        }

        let mut evicted = 0;
        while self.max_bytes != 0 && self.nbytes > self.max_bytes {
            if !self.remove_oldest() {
                break;
            }
            evicted += 1;
        }
        evicted
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry, if any, and reports it to the
    /// eviction callback. Returns whether an entry was removed.
    pub fn remove_oldest(&mut self) -> bool {
        if self.tail == NIL {
            return false;
        }
        let idx = self.tail;
        self.unlink(idx);
        let key = std::mem::take(&mut self.arena[idx].key);
        let value = self.arena[idx].value.take();
        self.map.remove(&key);
        self.arena[idx].next = self.free_head;
        self.free_head = idx;

        if let Some(value) = value {
            self.nbytes -= key.len() + value.byte_size();
            if let Some(on_evicted) = self.on_evicted.as_mut() {
                on_evicted(key, value);
            }
        }
        true
    }

    // == Accessors ==
    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the bytes currently accounted to live entries.
    pub fn bytes(&self) -> usize {
        self.nbytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            arena: &self.arena,
            current: self.head,
        }
    }

    // == Recency List ==
    fn alloc_slot(&mut self, key: String, value: V) -> usize {
        let node = Node {
            key,
            value: Some(value),
            prev: NIL,
            next: NIL,
        };
        if self.free_head != NIL {
            let idx = self.free_head;
            self.free_head = self.arena[idx].next;
            self.arena[idx] = node;
            idx
        } else {
            self.arena.push(node);
            self.arena.len() - 1
        }
    }

    fn unlink(&mut self, idx: usize) {
        let prev = self.arena[idx].prev;
        let next = self.arena[idx].next;

        if prev != NIL {
            self.arena[prev].next = next;
        } else {
            self.head = next;
        }

        if next != NIL {
            self.arena[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.arena[idx].prev = NIL;
        self.arena[idx].next = NIL;
    }

    fn push_head(&mut self, idx: usize) {
        self.arena[idx].prev = NIL;
        self.arena[idx].next = self.head;
        if self.head != NIL {
            self.arena[self.head].prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }

    fn move_to_head(&mut self, idx: usize) {
        if self.head != idx {
            self.unlink(idx);
            self.push_head(idx);
        }
    }
}

// == Iterator ==
/// Iterator over `(key, value)` pairs from most to least recently used.
pub struct Iter<'a, V> {
    arena: &'a [Node<V>],
    current: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.current != NIL {
            let node = &self.arena[self.current];
            self.current = node.next;
            if let Some(value) = node.value.as_ref() {
                return Some((node.key.as_str(), value));
            }
        }
        None
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn keys<V: ByteSize>(lru: &LruCache<V>) -> Vec<String> {
        lru.iter().map(|(k, _)| k.to_string()).collect()
    }

    #[test]
    fn test_get_hit_and_miss() {
        let mut lru = LruCache::new(0);
        lru.add("key1", "1234".to_string());

        assert_eq!(lru.get("key1"), Some(&"1234".to_string()));
        assert_eq!(lru.get("key2"), None);
    }

    #[test]
    fn test_miss_has_no_side_effects() {
        let mut lru = LruCache::new(0);
        lru.add("a", "1".to_string());
        lru.add("b", "2".to_string());

        assert!(lru.get("zzz").is_none());
        assert_eq!(keys(&lru), vec!["b", "a"]);
        assert_eq!(lru.bytes(), 4);
    }

    #[test]
    fn test_remove_oldest_on_overflow() {
        let (k1, k2, k3) = ("key1", "key2", "k3");
        let (v1, v2, v3) = ("value1", "value2", "v3");
        let cap = k1.len() + k2.len() + v1.len() + v2.len();
        let mut lru = LruCache::new(cap);

        lru.add(k1, v1.to_string());
        lru.add(k2, v2.to_string());
        let evicted = lru.add(k3, v3.to_string());

        assert_eq!(evicted, 1);
        assert!(lru.get("key1").is_none());
        assert_eq!(lru.len(), 2);
    }

    #[test]
    fn test_on_evicted_receives_entries_in_recency_order() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&evicted);
        let mut lru = LruCache::with_eviction_callback(
            10,
            Box::new(move |key: String, _value: String| sink.lock().unwrap().push(key)),
        );

        lru.add("key1", "123456".to_string());
        lru.add("k2", "k2".to_string());
        lru.add("k3", "k3".to_string());
        lru.add("k4", "k4".to_string());

        assert_eq!(*evicted.lock().unwrap(), vec!["key1", "k2"]);
    }

    #[test]
    fn test_get_promotes_entry() {
        let mut lru = LruCache::new(12);
        lru.add("k1", "v1".to_string());
        lru.add("k2", "v2".to_string());
        lru.add("k3", "v3".to_string());

        // k1 becomes most recent, so k2 is the next victim
        lru.get("k1");
        lru.add("k4", "v4".to_string());

        assert!(lru.peek("k1").is_some());
        assert!(lru.peek("k2").is_none());
        assert!(lru.peek("k3").is_some());
        assert!(lru.peek("k4").is_some());
    }

    #[test]
    fn test_update_adjusts_byte_total() {
        let mut lru = LruCache::new(0);
        lru.add("key", "short".to_string());
        assert_eq!(lru.bytes(), 8);

        lru.add("key", "much longer".to_string());
        assert_eq!(lru.bytes(), 14);
        assert_eq!(lru.len(), 1);

        lru.add("key", "x".to_string());
        assert_eq!(lru.bytes(), 4);
    }

    #[test]
    fn test_update_promotes_entry() {
        let mut lru = LruCache::new(12);
        lru.add("k1", "v1".to_string());
        lru.add("k2", "v2".to_string());
        lru.add("k3", "v3".to_string());

        lru.add("k1", "v9".to_string());
        lru.add("k4", "v4".to_string());

        assert_eq!(lru.peek("k1"), Some(&"v9".to_string()));
        assert!(lru.peek("k2").is_none());
    }

    #[test]
    fn test_oversized_entry_evicts_itself() {
        let mut lru = LruCache::new(8);
        lru.add("a", "123".to_string());

        let evicted = lru.add("big", "0123456789".to_string());

        assert_eq!(evicted, 2);
        assert!(lru.is_empty());
        assert_eq!(lru.bytes(), 0);
    }

    #[test]
    fn test_zero_budget_is_unbounded() {
        let mut lru = LruCache::new(0);
        for i in 0..1000 {
            lru.add(&format!("key{i}"), vec![0u8; 64]);
        }
        assert_eq!(lru.len(), 1000);
    }

    #[test]
    fn test_remove_oldest_manually() {
        let mut lru = LruCache::new(0);
        assert!(!lru.remove_oldest());

        lru.add("a", "1".to_string());
        lru.add("b", "2".to_string());
        lru.get("a");

        assert!(lru.remove_oldest());
        assert!(lru.peek("b").is_none());
        assert_eq!(lru.bytes(), 2);
        assert_eq!(keys(&lru), vec!["a"]);
    }

    #[test]
    fn test_slots_are_reused_after_eviction() {
        let mut lru = LruCache::new(4);
        for i in 0..100 {
            lru.add(&format!("k{}", i % 10), "v".to_string());
        }
        assert!(lru.arena.len() <= 2);
        assert!(lru.bytes() <= 4);
    }
}
