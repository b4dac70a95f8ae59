//! Group Module
//!
//! A named cache namespace: main cache, local data source, optional peers.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::cache::{ByteView, Cache, CacheStats};
use crate::error::{CacheError, Result};
use crate::group::{Getter, GroupStats, GroupStatsSnapshot};
use crate::peers::{PeerGetter, PeerPicker};
use crate::singleflight::Flight;

// == Group ==
/// A cache namespace and the data loaded into it.
///
/// Lookups go to the main cache first. On a miss, concurrent callers for the
/// same key share one load, which asks the owning peer (if peers are
/// registered and the key is remote) and falls back to the local [`Getter`].
/// Only locally loaded values are added to the main cache.
pub struct Group {
    name: String,
    getter: Arc<dyn Getter>,
    main_cache: Cache,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    loader: Flight<Result<ByteView>>,
    stats: GroupStats,
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("main_cache", &self.main_cache)
            .field("has_peers", &self.peers.get().is_some())
            .finish()
    }
}

impl Group {
    // == Constructor ==
    /// Groups are normally created through
    /// [`Registry::new_group`](crate::group::Registry::new_group).
    pub fn new(name: impl Into<String>, cache_bytes: usize, getter: Arc<dyn Getter>) -> Self {
        Self {
            name: name.into(),
            getter,
            main_cache: Cache::new(cache_bytes),
            peers: OnceLock::new(),
            loader: Flight::new(),
            stats: GroupStats::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Register Peers ==
    /// Attaches the peer picker. Peers are wired once at startup; a second
    /// call is rejected with [`CacheError::PeersAlreadyRegistered`].
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers
            .set(peers)
            .map_err(|_| CacheError::PeersAlreadyRegistered(self.name.clone()))
    }

    // == Get ==
    /// Returns the value for `key`, loading it on a cache miss.
    ///
    /// An empty key fails with [`CacheError::EmptyKey`] without touching the
    /// cache or the data source. Load errors are returned unchanged.
    pub fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }
        GroupStats::incr(&self.stats.gets);

        if let Some(value) = self.main_cache.get(key) {
            GroupStats::incr(&self.stats.cache_hits);
            debug!(group = %self.name, key, "cache hit");
            return Ok(value);
        }
        self.load(key)
    }

    fn load(&self, key: &str) -> Result<ByteView> {
        GroupStats::incr(&self.stats.loads);
        self.loader.run(key, || {
            GroupStats::incr(&self.stats.loads_executed);
            if let Some(peer) = self.peers.get().and_then(|p| p.pick_peer(key)) {
                match self.get_from_peer(peer.as_ref(), key) {
                    Ok(value) => {
                        GroupStats::incr(&self.stats.peer_loads);
                        return Ok(value);
                    }
                    Err(err) => {
                        GroupStats::incr(&self.stats.peer_errors);
                        warn!(group = %self.name, key, error = %err, "failed to get from peer, loading locally");
                    }
                }
            }
            self.get_locally(key)
        })
    }

    /// The transport hands back an owned buffer, so it becomes the view
    /// without another copy.
    fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        peer.get(&self.name, key).map(ByteView::from)
    }

    fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = match self.getter.get(key) {
            Ok(bytes) => bytes,
            Err(err) => {
                GroupStats::incr(&self.stats.local_load_errors);
                return Err(err);
            }
        };
        GroupStats::incr(&self.stats.local_loads);

        let value = ByteView::from(bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }

    // == Stats ==
    pub fn stats(&self) -> GroupStatsSnapshot {
        self.stats.snapshot()
    }

    /// Counters of the main cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.main_cache.stats()
    }

    pub fn cache_bytes(&self) -> usize {
        self.main_cache.max_bytes()
    }
}
