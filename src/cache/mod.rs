//! Cache Module
//!
//! Provides the byte-budgeted LRU cache, its immutable value type and a
//! thread-safe wrapper used by cache groups.

mod byteview;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use byteview::ByteView;
pub use lru::{EvictHook, LruCache, Value};
pub use stats::CacheStats;
pub use store::SharedCache;
