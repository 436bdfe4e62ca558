//! Group Module
//!
//! A named cache namespace that fills itself from a loader on a miss.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{ByteView, CacheStats, SharedCache};
use crate::error::{CacheError, Result};
use crate::group::Getter;

// == Group ==
/// A cache namespace with its own byte budget and loader.
///
/// Safe to share between threads. Two concurrent misses on the same key
/// both call the loader.
pub struct Group {
    name: String,
    getter: Arc<dyn Getter>,
    main_cache: SharedCache,
}

impl Group {
    /// Starts building a group called `name`.
    pub fn builder(name: impl Into<String>) -> GroupBuilder {
        GroupBuilder {
            name: name.into(),
            max_bytes: 0,
            getter: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Get ==
    /// Returns the value for `key`, loading it on a miss.
    ///
    /// # Errors
    /// - `InvalidRequest` if the key is empty
    /// - `Load` if the loader fails
    pub fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::InvalidRequest("key is required".to_string()));
        }

        if let Some(view) = self.main_cache.get(key) {
            debug!(group = %self.name, key, "Cache hit");
            return Ok(view);
        }

        self.load(key)
    }

    fn load(&self, key: &str) -> Result<ByteView> {
        let bytes = self.getter.get(key).map_err(|source| {
            warn!(group = %self.name, key, error = %source, "Loader failed");
            CacheError::Load {
                key: key.to_string(),
                source,
            }
        })?;

        let view = ByteView::from(bytes);
        self.main_cache.record_load();
        self.populate_cache(key, view.clone());
        info!(group = %self.name, key, bytes = view.len(), "Loaded value from source");
        Ok(view)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }

    /// Returns a snapshot of this group's cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.main_cache.stats()
    }

    pub fn max_bytes(&self) -> u64 {
        self.main_cache.max_bytes()
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("main_cache", &self.main_cache)
            .finish_non_exhaustive()
    }
}

// == Group Builder ==
/// Builder for [`Group`]; a loader is mandatory.
pub struct GroupBuilder {
    name: String,
    max_bytes: u64,
    getter: Option<Arc<dyn Getter>>,
}

impl GroupBuilder {
    /// Byte budget for the group's cache, 0 = unbounded.
    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn getter(mut self, getter: impl Getter + 'static) -> Self {
        self.getter = Some(Arc::new(getter));
        self
    }

    /// Uses a loader that is already shared with other groups.
    pub fn shared_getter(mut self, getter: Arc<dyn Getter>) -> Self {
        self.getter = Some(getter);
        self
    }

    // == Build ==
    /// # Errors
    /// `Configuration` if the name is empty or no loader was given.
    pub fn build(self) -> Result<Group> {
        if self.name.is_empty() {
            return Err(CacheError::Configuration(
                "group name cannot be empty".to_string(),
            ));
        }
        let getter = self.getter.ok_or_else(|| {
            CacheError::Configuration(format!("group '{}' has no getter", self.name))
        })?;

        Ok(Group {
            name: self.name,
            getter,
            main_cache: SharedCache::new(self.max_bytes),
        })
    }
}
