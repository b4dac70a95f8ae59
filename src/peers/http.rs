//! HTTP Peer Transport
//!
//! [`HttpPool`] picks the owning node for a key from a consistent hash ring;
//! [`HttpGetter`] fetches values from that node's peer endpoint.
//!
//! Both use `reqwest::blocking`, so they must be created, used and dropped
//! outside async worker threads (the server calls them from
//! `spawn_blocking`).

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::blocking::Client;
use reqwest::Url;
use tracing::{debug, info};

use crate::error::{CacheError, Result};
use crate::peers::{HashRing, PeerGetter, PeerPicker};

/// First path segment of the peer endpoint: `/{PEER_BASE_PATH}/{group}/{key}`.
pub const PEER_BASE_PATH: &str = "_peercache";

// == HTTP Getter ==
/// Client for one remote node.
#[derive(Debug, Clone)]
pub struct HttpGetter {
    base_url: String,
    client: Client,
}

impl HttpGetter {
    /// Creates a getter for the node at `base_url` (e.g. `http://10.0.0.2:8001`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, group: &str, key: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CacheError::Peer(format!("invalid peer url {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| CacheError::Peer(format!("peer url cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend([PEER_BASE_PATH, group, key]);
        Ok(url)
    }
}

impl PeerGetter for HttpGetter {
    fn get(&self, group: &str, key: &str) -> Result<Vec<u8>> {
        let url = self.url(group, key)?;
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| CacheError::Peer(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::Peer(format!(
                "{} returned {status}",
                self.base_url
            )));
        }

        let body = response
            .bytes()
            .map_err(|e| CacheError::Peer(format!("reading response body: {e}")))?;
        Ok(body.to_vec())
    }
}

// == HTTP Pool ==
#[derive(Debug)]
struct PoolState {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

/// Consistent-hash peer picker over a set of HTTP nodes.
///
/// `self_url` must match this node's entry in the peer list exactly; keys
/// that hash to it are handled locally.
#[derive(Debug)]
pub struct HttpPool {
    self_url: String,
    replicas: usize,
    client: Client,
    state: RwLock<PoolState>,
}

impl HttpPool {
    // == Constructor ==
    pub fn new(self_url: impl Into<String>, replicas: usize) -> Self {
        Self {
            self_url: self_url.into(),
            replicas,
            client: Client::new(),
            state: RwLock::new(PoolState {
                ring: HashRing::new(replicas),
                getters: HashMap::new(),
            }),
        }
    }

    // == Set Peers ==
    /// Replaces the peer set. `peers` should include this node.
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let peers: Vec<String> = peers.into_iter().map(Into::into).collect();
        let mut ring = HashRing::new(self.replicas);
        ring.add(&peers);
        let getters = peers
            .iter()
            .map(|peer| {
                let getter = HttpGetter::with_client(peer.clone(), self.client.clone());
                (peer.clone(), Arc::new(getter))
            })
            .collect();

        *self.state.write() = PoolState { ring, getters };
        info!(node = %self.self_url, ?peers, "peer set updated");
    }

    pub fn self_url(&self) -> &str {
        &self.self_url
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.state.read();
        let peer = state.ring.get(key)?;
        if peer == self.self_url {
            return None;
        }
        debug!(node = %self.self_url, peer, key, "picked remote peer");
        let getter = state.getters.get(peer)?;
        Some(Arc::clone(getter) as Arc<dyn PeerGetter>)
    }
}
