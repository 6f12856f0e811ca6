//! UUID binding and resolution for Folio content.
//!
//! Every addressable entity gets a stable identifier of the form
//! `scheme://shortId`:
//!
//! | entity | identifier          | short id                          |
//! |--------|---------------------|-----------------------------------|
//! | site   | `site://`           | always empty                      |
//! | page   | `page://<uuid>`     | random, stored in the "uuid" field |
//! | file   | `file://<uuid>`     | random, stored in the "uuid" field |
//! | user   | `user://<user id>`  | the user's native key             |
//!
//! Page and file ids survive moves and renames because they live in the
//! content itself, not in the path. Resolving them back is cache-first with a
//! full index scan as the authoritative fallback.
//!
//! # Example
//!
//! ```
//! use folio_resolver::Resolver;
//! use folio_storage::{ContentStore, MemoryCache, MemoryStore};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::default());
//! store.insert_page("blog", json!({"title": "Blog"})).unwrap();
//!
//! let resolver = Resolver::new(store.clone(), Arc::new(MemoryCache::new()));
//! let ctx = resolver.context();
//!
//! let page = store.page("blog").unwrap();
//! let id = resolver.to_identifier(&ctx, &page).unwrap();
//! let found = resolver.to_entity(&ctx, &id).unwrap();
//! assert_eq!(found.key, "blog");
//! ```

mod config;
mod context;
mod error;
mod generator;
mod resolver;
mod scanner;

pub use config::ResolverConfig;
pub use context::ResolutionContext;
pub use error::{ResolveError, ResolveResult};
pub use generator::{IdSource, RandomUuid};
pub use resolver::{Binding, DuplicateEntry, ReindexReport, Resolver};
pub use scanner::IndexScanner;
