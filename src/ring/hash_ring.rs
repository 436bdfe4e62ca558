//! Hash Ring Module
//!
//! Consistent hashing over virtual nodes.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use tracing::debug;

/// Maps bytes to a position on the ring.
pub type HashFn = fn(&[u8]) -> u32;

/// Default hash: CRC-32 (IEEE polynomial).
pub fn crc32_ieee(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

// == Hash Ring ==
/// Consistent-hashing ring assigning keys to real nodes.
///
/// Every real node is placed on the ring `replicas` times, at the hashes of
/// `"{i}{node}"` for `i in 0..replicas`. A key belongs to the first virtual
/// node at or after its own hash, wrapping past the highest position back to
/// the lowest.
///
/// Positions are unique. If a virtual node label hashes to a position that
/// is already taken, the earlier owner keeps it and the later node waits in
/// line for it. When the owner is removed the position passes to the next
/// node in line, so every remaining node keeps all `replicas` positions.
///
/// The ring is not synchronized; see [`PeerRouter`](crate::ring::PeerRouter)
/// for the locked wrapper.
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Sorted ascending
    positions: Vec<u32>,
    /// Position -> real node
    owners: HashMap<u32, String>,
    /// Position -> nodes whose label collided with the owner, oldest first
    shadowed: HashMap<u32, Vec<String>>,
}

impl HashRing {
    // == Constructor ==
    /// Creates an empty ring. `hash` defaults to [`crc32_ieee`].
    pub fn new(replicas: usize, hash: Option<HashFn>) -> Self {
        Self {
            hash: hash.unwrap_or(crc32_ieee),
            replicas,
            positions: Vec::new(),
            owners: HashMap::new(),
            shadowed: HashMap::new(),
        }
    }

    fn position(&self, replica: usize, node: &str) -> u32 {
        (self.hash)(format!("{replica}{node}").as_bytes())
    }

    // == Add ==
    /// Places each node on the ring `replicas` times.
    ///
    /// Adding a node that is already present changes nothing.
    pub fn add<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            for i in 0..self.replicas {
                let pos = self.position(i, node);
                if let Some(owner) = self.owners.get(&pos) {
                    if owner != node {
                        debug!(
                            node,
                            owner = owner.as_str(),
                            pos,
                            "Virtual node collision, keeping first owner"
                        );
                        let waiting = self.shadowed.entry(pos).or_default();
                        if !waiting.iter().any(|n| n == node) {
                            waiting.push(node.to_string());
                        }
                    }
                    continue;
                }
                self.owners.insert(pos, node.to_string());
                self.positions.push(pos);
            }
        }
        self.positions.sort_unstable();
    }

    // == Get ==
    /// Returns the node owning `key`.
    ///
    /// Returns None for an empty key or an empty ring.
    pub fn get(&self, key: &str) -> Option<&str> {
        if key.is_empty() || self.positions.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.positions.partition_point(|&pos| pos < hash);
        let pos = self.positions[idx % self.positions.len()];
        self.owners.get(&pos).map(String::as_str)
    }

    // == Remove ==
    /// Takes a node's virtual nodes off the ring.
    ///
    /// Positions that are missing are skipped. A position the node owns
    /// but another node collided on is handed to that node instead of being
    /// dropped. Returns the number of positions the node gave up.
    pub fn remove(&mut self, node: &str) -> usize {
        let mut removed = 0;
        for i in 0..self.replicas {
            let pos = self.position(i, node);
            if self.owners.get(&pos).map(String::as_str) != Some(node) {
                self.forget_waiting(pos, node);
                continue;
            }

            match self.take_next_waiting(pos) {
                Some(heir) => {
                    debug!(node, heir = heir.as_str(), pos, "Virtual node handed over");
                    self.owners.insert(pos, heir);
                }
                None => {
                    if let Ok(idx) = self.positions.binary_search(&pos) {
                        self.positions.remove(idx);
                    }
                    self.owners.remove(&pos);
                }
            }
            removed += 1;
        }
        removed
    }

    fn take_next_waiting(&mut self, pos: u32) -> Option<String> {
        let waiting = self.shadowed.get_mut(&pos)?;
        let heir = waiting.remove(0);
        if waiting.is_empty() {
            self.shadowed.remove(&pos);
        }
        Some(heir)
    }

    fn forget_waiting(&mut self, pos: u32, node: &str) {
        if let Some(waiting) = self.shadowed.get_mut(&pos) {
            waiting.retain(|n| n != node);
            if waiting.is_empty() {
                self.shadowed.remove(&pos);
            }
        }
    }

    /// Distinct real nodes on the ring, sorted.
    pub fn nodes(&self) -> Vec<&str> {
        self.owners
            .values()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("positions", &self.positions.len())
            .field("nodes", &self.nodes())
            .finish()
    }
}
