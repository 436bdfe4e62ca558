//! Shared Cache Module
//!
//! Thread-safe wrapper around the byte-budgeted LRU cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{ByteView, CacheStats, LruCache};

#[derive(Debug, Default)]
struct Inner {
    /// Created on first insert
    lru: Option<LruCache<ByteView>>,
    stats: CacheStats,
}

// == Shared Cache ==
/// Mutex-guarded [`LruCache`] of [`ByteView`] values.
///
/// The underlying cache is built lazily on the first [`add`](Self::add), so
/// groups that are registered but never populated cost nothing.
#[derive(Debug)]
pub struct SharedCache {
    max_bytes: u64,
    inner: Mutex<Inner>,
    /// Bumped from the eviction hook, which must not take `inner`
    evictions: Arc<AtomicU64>,
}

impl SharedCache {
    // == Constructor ==
    /// Creates an empty cache with the given byte budget (0 = unbounded).
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            inner: Mutex::new(Inner::default()),
            evictions: Arc::new(AtomicU64::new(0)),
        }
    }

    // == Get ==
    /// Returns a view of the cached value, recording a hit or a miss.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut inner = self.inner.lock();
        let found = inner.lru.as_mut().and_then(|lru| lru.get(key).cloned());

        match found {
            Some(view) => {
                inner.stats.record_hit();
                Some(view)
            }
            None => {
                inner.stats.record_miss();
                None
            }
        }
    }

    // == Add ==
    /// Stores a value, evicting least recently used entries if needed.
    pub fn add(&self, key: &str, value: ByteView) {
        let mut inner = self.inner.lock();
        let max_bytes = self.max_bytes;
        let evictions = Arc::clone(&self.evictions);

        inner
            .lru
            .get_or_insert_with(|| {
                LruCache::new(max_bytes).with_evict_hook(move |key: &str, value: &ByteView| {
                    evictions.fetch_add(1, Ordering::Relaxed);
                    debug!(key, bytes = value.len(), "Evicted cache entry");
                })
            })
            .add(key, value);
    }

    /// Counts a value fetched from a loader.
    pub fn record_load(&self) {
        self.inner.lock().stats.record_load();
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        stats.evictions = self.evictions.load(Ordering::Relaxed);
        if let Some(lru) = inner.lru.as_ref() {
            stats.total_entries = lru.len();
            stats.used_bytes = lru.used_bytes();
        }
        stats
    }

    pub fn len(&self) -> usize {
        self.inner.lock().lru.as_ref().map_or(0, LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }
}
