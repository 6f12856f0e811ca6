//! Short id → native key lookup cache.

use crate::StorageResult;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// A key-value cache from short id to the entity's native store key.
///
/// The cache knows nothing about schemes: page and file ids share one
/// namespace. Implementations must be safe to share between threads; each
/// call is atomic for its key, nothing more.
pub trait LookupCache: Send + Sync {
    /// Returns the cached native key for `short_id`.
    fn get(&self, short_id: &str) -> StorageResult<Option<String>>;

    /// Stores or replaces the entry for `short_id`.
    fn set(&self, short_id: &str, native_key: &str) -> StorageResult<()>;

    /// Removes the entry. Returns whether one existed.
    fn remove(&self, short_id: &str) -> StorageResult<bool>;

    /// Drops every entry.
    fn clear(&self) -> StorageResult<()>;
}

/// Process-local [`LookupCache`].
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LookupCache for MemoryCache {
    fn get(&self, short_id: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(short_id).cloned())
    }

    fn set(&self, short_id: &str, native_key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(short_id.to_string(), native_key.to_string());
        Ok(())
    }

    fn remove(&self, short_id: &str) -> StorageResult<bool> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.remove(short_id).is_some())
    }

    fn clear(&self) -> StorageResult<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}
