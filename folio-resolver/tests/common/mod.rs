#![allow(dead_code)]

use folio_model::{ContentRef, Entity};
use folio_resolver::{IdSource, Resolver, ResolverConfig};
use folio_storage::{ContentStore, MemoryCache, MemoryStore, StorageResult};
use folio_types::Scheme;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Wraps a [`MemoryStore`] and counts full page enumerations, which is what
/// every index scan starts with.
pub struct CountingStore {
    pub inner: MemoryStore,
    scans: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            scans: AtomicUsize::new(0),
        }
    }

    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.scans.store(0, Ordering::SeqCst);
    }
}

impl ContentStore for CountingStore {
    fn site(&self) -> ContentRef {
        self.inner.site()
    }

    fn pages(&self) -> Vec<ContentRef> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        self.inner.pages()
    }

    fn files_of(&self, owner: &Entity) -> Vec<ContentRef> {
        self.inner.files_of(owner)
    }

    fn files(&self) -> Vec<ContentRef> {
        self.inner.files()
    }

    fn page(&self, key: &str) -> Option<ContentRef> {
        self.inner.page(key)
    }

    fn file(&self, key: &str) -> Option<ContentRef> {
        self.inner.file(key)
    }

    fn user(&self, key: &str) -> Option<ContentRef> {
        self.inner.user(key)
    }

    fn write_uuid(&self, kind: Scheme, key: &str, uuid: &str) -> StorageResult<ContentRef> {
        self.inner.write_uuid(kind, key, uuid)
    }
}

/// Hands out scripted ids first, then `fallback-N`.
pub struct ScriptedIds {
    queue: Mutex<VecDeque<String>>,
    drawn: AtomicUsize,
}

impl ScriptedIds {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: Mutex::new(ids.into_iter().map(Into::into).collect()),
            drawn: AtomicUsize::new(0),
        }
    }

    pub fn drawn(&self) -> usize {
        self.drawn.load(Ordering::SeqCst)
    }
}

impl IdSource for ScriptedIds {
    fn draw(&self) -> String {
        let n = self.drawn.fetch_add(1, Ordering::SeqCst);
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| format!("fallback-{n}"))
    }
}

/// A small site:
///
/// ```text
/// site            (file logo.svg, uuid f-logo)
/// ├── blog        uuid p-blog
/// │   ├── hello   uuid p-hello (file cover.jpg, uuid f-cover)
/// │   └── wip     draft, uuid p-wip
/// └── about       no uuid (file team.png, no uuid)
/// users: alice
/// ```
pub fn sample_store() -> MemoryStore {
    let store = MemoryStore::new(json!({"title": "Folio"}));
    store.insert_page("blog", json!({"uuid": "p-blog"})).unwrap();
    store.insert_page("blog/hello", json!({"uuid": "p-hello", "title": "Hello"})).unwrap();
    store.insert_draft("blog/wip", json!({"uuid": "p-wip"})).unwrap();
    store.insert_page("about", json!({"title": "About"})).unwrap();
    store.insert_file("blog/hello", "cover.jpg", json!({"uuid": "f-cover"})).unwrap();
    store.insert_file("about", "team.png", json!({})).unwrap();
    store.insert_site_file("logo.svg", json!({"uuid": "f-logo"})).unwrap();
    store.insert_user("alice", json!({"name": "Alice"}));
    store
}

pub struct Fixture {
    pub store: Arc<CountingStore>,
    pub cache: Arc<MemoryCache>,
    pub resolver: Resolver,
}

pub fn fixture() -> Fixture {
    fixture_with(ResolverConfig::default())
}

pub fn fixture_with(config: ResolverConfig) -> Fixture {
    let store = Arc::new(CountingStore::new(sample_store()));
    let cache = Arc::new(MemoryCache::new());
    let resolver = Resolver::new(store.clone(), cache.clone()).with_config(config);
    Fixture {
        store,
        cache,
        resolver,
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
