//! Ring Module
//!
//! Consistent hashing of keys onto peers.

mod hash_ring;
mod router;


pub use hash_ring::{crc32_ieee, HashFn, HashRing};
pub use router::PeerRouter;

/// Virtual nodes per peer when none is configured.
pub const DEFAULT_REPLICAS: usize = 50;
