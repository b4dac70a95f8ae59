//! Consistent Hash Ring
//!
//! Maps keys onto peers through `replicas` virtual nodes per peer, so adding
//! or removing a peer only moves the keys adjacent to its virtual nodes.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::Hasher;

/// Hash function used to place peers and keys on the ring.
pub type HashFn = fn(&[u8]) -> u64;

/// `DefaultHasher::new` uses fixed keys, so every process built from the
/// same binary places keys identically. Its algorithm may change between
/// Rust releases, so all nodes of a pool must run the same build (or share
/// a ring built with [`HashRing::with_hash`] and a pinned hash).
pub fn default_hash(data: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write(data);
    hasher.finish()
}

// == Hash Ring ==
#[derive(Debug, Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Sorted virtual node hashes
    keys: Vec<u64>,
    nodes: HashMap<u64, String>,
}

impl HashRing {
    // == Constructor ==
    /// Creates an empty ring with `replicas` virtual nodes per peer
    /// (clamped to at least 1).
    pub fn new(replicas: usize) -> Self {
        Self::with_hash(replicas, default_hash)
    }

    pub fn with_hash(replicas: usize, hash: HashFn) -> Self {
        Self {
            hash,
            replicas: replicas.max(1),
            keys: Vec::new(),
            nodes: HashMap::new(),
        }
    }

    // == Add ==
    /// Places each peer's virtual nodes `"{i}{peer}"` on the ring.
    pub fn add<I, S>(&mut self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for peer in peers {
            let peer = peer.as_ref();
            for i in 0..self.replicas {
                let h = (self.hash)(format!("{i}{peer}").as_bytes());
                self.keys.push(h);
                self.nodes.insert(h, peer.to_string());
            }
        }
        self.keys.sort_unstable();
        self.keys.dedup();
    }

    // == Get ==
    /// Returns the peer owning `key`: the first virtual node clockwise from
    /// the key's hash, wrapping to the start of the ring.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }
        let h = (self.hash)(key.as_bytes());
        let idx = self.keys.partition_point(|&k| k < h) % self.keys.len();
        self.nodes.get(&self.keys[idx]).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
