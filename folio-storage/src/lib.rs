//! Storage boundary for Folio.
//!
//! Two external collaborators live behind traits here:
//!
//! - [`ContentStore`] — the hierarchical site/page/file tree plus users. It is
//!   the source of truth for every "uuid" field.
//! - [`LookupCache`] — a scheme-agnostic short id → native key map used to
//!   skip full index scans. Entries are advisory and rebuildable.
//!
//! # Implementations
//!
//! - [`MemoryStore`] keeps the whole tree in memory behind an `RwLock`
//! - [`MemoryCache`] is a process-local cache
//! - [`SqliteCache`] persists entries in a SQLite file so they survive restarts

mod cache;
mod error;
mod sqlite_cache;
mod store;

pub use cache::{LookupCache, MemoryCache};
pub use error::{StorageError, StorageResult};
pub use sqlite_cache::SqliteCache;
pub use store::{ContentStore, MemoryStore};
