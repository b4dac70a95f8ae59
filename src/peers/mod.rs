//! Peers Module
//!
//! Interfaces a [`Group`](crate::group::Group) uses to reach other nodes,
//! plus the consistent-hash HTTP implementation used by the server binary.

mod http;
mod ring;

use std::sync::Arc;

use crate::error::Result;

pub use http::{HttpGetter, HttpPool, PEER_BASE_PATH};
pub use ring::{default_hash, HashFn, HashRing};

// == Peer Getter ==
/// Fetches a value for `(group, key)` from one remote node.
pub trait PeerGetter: Send + Sync {
    /// Returns the owned bytes of the value or the reason the peer failed.
    fn get(&self, group: &str, key: &str) -> Result<Vec<u8>>;
}

// == Peer Picker ==
/// Maps a key to the node that owns it.
pub trait PeerPicker: Send + Sync {
    /// Returns the owning peer, or `None` when this node owns `key`.
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}
