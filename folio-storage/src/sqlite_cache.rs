//! Persistent lookup cache backed by SQLite.
//!
//! Uses its own file so cache data can be wiped without touching content.

use crate::{LookupCache, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// [`LookupCache`] that survives process restarts.
pub struct SqliteCache {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCache {
    /// Opens (or creates) a cache database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        debug!("Opening uuid cache at {}", path.display());
        Self::with_connection(Connection::open(path)?)
    }

    /// Opens an in-memory cache (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        let cache = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        cache.init_schema()?;
        Ok(cache)
    }

    fn init_schema(&self) -> StorageResult<()> {
        self.lock().execute_batch(
            "
            CREATE TABLE IF NOT EXISTS uuid_cache (
                short_id TEXT PRIMARY KEY,
                native_key TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> StorageResult<usize> {
        let count: i64 = self
            .lock()
            .query_row("SELECT COUNT(*) FROM uuid_cache", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl LookupCache for SqliteCache {
    fn get(&self, short_id: &str) -> StorageResult<Option<String>> {
        let key = self
            .lock()
            .query_row(
                "SELECT native_key FROM uuid_cache WHERE short_id = ?1",
                params![short_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(key)
    }

    fn set(&self, short_id: &str, native_key: &str) -> StorageResult<()> {
        self.lock().execute(
            "INSERT OR REPLACE INTO uuid_cache (short_id, native_key) VALUES (?1, ?2)",
            params![short_id, native_key],
        )?;
        Ok(())
    }

    fn remove(&self, short_id: &str) -> StorageResult<bool> {
        let removed = self
            .lock()
            .execute("DELETE FROM uuid_cache WHERE short_id = ?1", params![short_id])?;
        Ok(removed > 0)
    }

    fn clear(&self) -> StorageResult<()> {
        self.lock().execute("DELETE FROM uuid_cache", [])?;
        Ok(())
    }
}
