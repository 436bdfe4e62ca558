//! Peer Router Module
//!
//! Decides which peer owns a key, using a shared hash ring.

use parking_lot::RwLock;
use tracing::info;

use crate::ring::HashRing;

// == Peer Router ==
/// Read-mostly wrapper around a [`HashRing`] of peer addresses.
///
/// Lookups take a read lock; replacing the peer set takes the write lock
/// once and swaps in a freshly built ring.
#[derive(Debug)]
pub struct PeerRouter {
    /// This node's address, as it appears in the peer list
    self_addr: String,
    replicas: usize,
    ring: RwLock<HashRing>,
}

impl PeerRouter {
    // == Constructor ==
    /// Creates a router with no peers. Every key is local until
    /// [`set_peers`](Self::set_peers) is called.
    pub fn new(self_addr: impl Into<String>, replicas: usize) -> Self {
        Self {
            self_addr: self_addr.into(),
            replicas,
            ring: RwLock::new(HashRing::new(replicas, None)),
        }
    }

    // == Set Peers ==
    /// Replaces the peer set.
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ring = HashRing::new(self.replicas, None);
        ring.add(peers);
        let nodes = ring.nodes().len();
        let replicas = ring.replicas();
        *self.ring.write() = ring;
        info!(peers = nodes, replicas, "Peer ring updated");
    }

    // == Owner ==
    /// Returns the peer owning `key`, or None when the key is empty or no
    /// peers are configured.
    pub fn owner(&self, key: &str) -> Option<String> {
        self.ring.read().get(key).map(str::to_string)
    }

    /// Returns the owning peer only when it is not this node.
    pub fn pick_remote(&self, key: &str) -> Option<String> {
        self.owner(key).filter(|owner| *owner != self.self_addr)
    }

    /// True when this node should serve `key` itself.
    pub fn is_local(&self, key: &str) -> bool {
        self.pick_remote(key).is_none()
    }

    pub fn peers(&self) -> Vec<String> {
        self.ring
            .read()
            .nodes()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }
}
