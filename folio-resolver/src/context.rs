//! Per-operation memo of resolved bindings.
//!
//! A [`ResolutionContext`] lives for one request or batch job. It remembers
//! every identifier → entity resolution and every generated identifier so the
//! same work is never done twice within the operation. Nothing in it is ever
//! invalidated; drop the context when the operation ends.

use crate::Binding;
use folio_model::ContentRef;
use folio_types::{Identifier, Scheme};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

type Slot<V> = Arc<Mutex<Option<V>>>;

/// A map whose values are computed at most once per key, even under
/// concurrent callers. Each key gets its own slot mutex, so resolving one key
/// never blocks resolution of another.
struct MemoTable<K, V> {
    slots: Mutex<HashMap<K, Slot<V>>>,
}

impl<K: Eq + Hash, V: Clone> MemoTable<K, V> {
    fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, key: K) -> Slot<V> {
        Arc::clone(lock(&self.slots).entry(key).or_default())
    }

    fn get(&self, key: &K) -> Option<V> {
        let slot = lock(&self.slots).get(key).map(Arc::clone)?;
        let value = lock(&slot).clone();
        value
    }

    /// Returns the memoized value or runs `init` while holding the key's slot.
    /// Errors are not memoized.
    fn get_or_try_init<E>(&self, key: K, init: impl FnOnce() -> Result<V, E>) -> Result<V, E> {
        let slot = self.slot(key);
        let mut value = lock(&slot);
        if let Some(existing) = value.as_ref() {
            return Ok(existing.clone());
        }
        let fresh = init()?;
        *value = Some(fresh.clone());
        Ok(fresh)
    }

    /// Stores `value` unless the key already has one.
    fn seed(&self, key: K, value: V) {
        let slot = self.slot(key);
        let mut current = lock(&slot);
        if current.is_none() {
            *current = Some(value);
        }
    }

    fn len(&self) -> usize {
        let slots: Vec<Slot<V>> = lock(&self.slots).values().map(Arc::clone).collect();
        slots.iter().filter(|slot| lock(slot).is_some()).count()
    }
}

/// Memo for one logical operation. Create one with
/// [`crate::Resolver::context`] and pass it to every call in that operation.
pub struct ResolutionContext {
    /// Identifier → resolved page or file.
    entities: MemoTable<Identifier, ContentRef>,
    /// (kind, native key) → binding created by generation.
    generated: MemoTable<(Scheme, String), Binding>,
    /// Short ids handed out by generation in this context.
    issued: Mutex<HashSet<String>>,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self {
            entities: MemoTable::new(),
            generated: MemoTable::new(),
            issued: Mutex::new(HashSet::new()),
        }
    }

    /// The memoized entity for `identifier`, if it was resolved before.
    pub fn cached(&self, identifier: &Identifier) -> Option<ContentRef> {
        self.entities.get(identifier)
    }

    /// Number of memoized identifier → entity bindings.
    pub fn resolved_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of identifiers generated in this context.
    pub fn generated_count(&self) -> usize {
        self.generated.len()
    }

    pub(crate) fn resolve_with<E>(
        &self,
        identifier: &Identifier,
        resolve: impl FnOnce() -> Result<ContentRef, E>,
    ) -> Result<ContentRef, E> {
        self.entities.get_or_try_init(identifier.clone(), resolve)
    }

    pub(crate) fn generate_with<E>(
        &self,
        kind: Scheme,
        key: &str,
        generate: impl FnOnce() -> Result<Binding, E>,
    ) -> Result<Binding, E> {
        self.generated
            .get_or_try_init((kind, key.to_string()), generate)
    }

    pub(crate) fn seed(&self, binding: &Binding) {
        self.entities
            .seed(binding.identifier.clone(), Arc::clone(&binding.entity));
    }

    /// Claims `short_id` for this context. Returns false if it was already
    /// issued here.
    pub(crate) fn reserve(&self, short_id: &str) -> bool {
        lock(&self.issued).insert(short_id.to_string())
    }
}

impl Default for ResolutionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResolutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("resolved", &self.resolved_count())
            .field("generated", &self.generated_count())
            .finish()
    }
}
