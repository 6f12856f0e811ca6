//! Identifier ↔ entity resolution.
//!
//! Lookup order for page and file identifiers:
//! 1. the [`ResolutionContext`] memo
//! 2. the [`LookupCache`] (verified against the store before it is trusted)
//! 3. a full [`IndexScanner`] pass
//!
//! Site and user identifiers never touch the cache or the index.

use crate::{
    IdSource, IndexScanner, RandomUuid, ResolutionContext, ResolveError, ResolveResult,
    ResolverConfig,
};
use folio_model::ContentRef;
use folio_storage::{ContentStore, LookupCache};
use folio_types::{Identifier, Scheme, DELIMITER};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// One identifier paired with the entity it names.
#[derive(Debug, Clone)]
pub struct Binding {
    pub identifier: Identifier,
    pub entity: ContentRef,
}

/// Short id shared by more than one page or file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateEntry {
    pub short_id: String,
    /// `(kind, native key)` of every entity carrying the id.
    pub entities: Vec<(Scheme, String)>,
}

/// Outcome of [`Resolver::reindex`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReindexReport {
    /// Pages written to the cache.
    pub pages: usize,
    /// Files written to the cache.
    pub files: usize,
    /// Pages and files with no "uuid" field yet.
    pub missing: usize,
    /// Ids left out of the cache because several entities share them.
    pub duplicates: Vec<DuplicateEntry>,
}

/// Resolves identifiers to entities and back.
pub struct Resolver {
    store: Arc<dyn ContentStore>,
    cache: Arc<dyn LookupCache>,
    ids: Arc<dyn IdSource>,
    config: ResolverConfig,
}

impl Resolver {
    /// Creates a resolver with the default config and random UUID ids.
    pub fn new(store: Arc<dyn ContentStore>, cache: Arc<dyn LookupCache>) -> Self {
        Self {
            store,
            cache,
            ids: Arc::new(RandomUuid),
            config: ResolverConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_id_source(mut self, ids: Arc<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// A fresh memo for one operation.
    pub fn context(&self) -> ResolutionContext {
        ResolutionContext::new()
    }

    pub fn scanner(&self) -> IndexScanner<'_> {
        IndexScanner::new(self.store.as_ref())
    }

    /// Parses `raw` and resolves it.
    pub fn resolve(&self, ctx: &ResolutionContext, raw: &str) -> ResolveResult<ContentRef> {
        self.to_entity(ctx, &Identifier::parse(raw)?)
    }

    /// Resolves an identifier to its entity.
    pub fn to_entity(
        &self,
        ctx: &ResolutionContext,
        identifier: &Identifier,
    ) -> ResolveResult<ContentRef> {
        match identifier.scheme() {
            Scheme::Site => Ok(self.store.site()),
            Scheme::User => self
                .store
                .user(identifier.short_id())
                .ok_or_else(|| ResolveError::NotFound(identifier.clone())),
            Scheme::Page | Scheme::File => {
                ctx.resolve_with(identifier, || self.lookup(identifier))
            }
        }
    }

    /// Returns the identifier for `entity`, generating one for pages and
    /// files that have none yet.
    pub fn to_identifier(
        &self,
        ctx: &ResolutionContext,
        entity: &ContentRef,
    ) -> ResolveResult<Identifier> {
        if let Some(identifier) = entity.stored_identifier() {
            return Ok(identifier);
        }

        let binding = ctx.generate_with(entity.kind, &entity.key, || self.assign(ctx, entity))?;
        ctx.seed(&binding);
        Ok(binding.identifier)
    }

    /// Resolves `raw` and pairs it with the result.
    pub fn bind_identifier(&self, ctx: &ResolutionContext, raw: &str) -> ResolveResult<Binding> {
        let identifier = Identifier::parse(raw)?;
        let entity = self.to_entity(ctx, &identifier)?;
        Ok(Binding { identifier, entity })
    }

    /// Pairs `entity` with its identifier. For freshly generated ids the
    /// binding carries the entity as it was persisted.
    pub fn bind_entity(&self, ctx: &ResolutionContext, entity: &ContentRef) -> ResolveResult<Binding> {
        let identifier = self.to_identifier(ctx, entity)?;
        let entity = ctx
            .cached(&identifier)
            .unwrap_or_else(|| Arc::clone(entity));
        Ok(Binding { identifier, entity })
    }

    /// Draws short ids until one is unused by every page, every file and
    /// every id already issued in `ctx`.
    pub fn generate(&self, ctx: &ResolutionContext) -> ResolveResult<String> {
        let attempts = self.config.max_generation_attempts;
        for attempt in 1..=attempts {
            let candidate = self.ids.draw();
            if candidate.is_empty() || candidate.contains(DELIMITER) {
                debug!("Discarding malformed candidate {:?}", candidate);
                continue;
            }
            if !ctx.reserve(&candidate) {
                debug!("Candidate {} already issued in this context", candidate);
                continue;
            }
            let scanner = self.scanner();
            if scanner.contains(Scheme::Page, &candidate) || scanner.contains(Scheme::File, &candidate)
            {
                debug!("Candidate {} collides with an existing entity", candidate);
                continue;
            }
            debug!("Generated short id {} after {} attempt(s)", candidate, attempt);
            return Ok(candidate);
        }
        Err(ResolveError::GenerationExhausted { attempts })
    }

    /// Rebuilds the lookup cache from a full scan of pages and files.
    ///
    /// Ids shared by several entities are reported and left uncached.
    pub fn reindex(&self) -> ResolveResult<ReindexReport> {
        let scanner = self.scanner();
        let mut report = ReindexReport::default();
        let mut by_id: BTreeMap<String, Vec<(Scheme, String)>> = BTreeMap::new();

        for scheme in [Scheme::Page, Scheme::File] {
            for entity in scanner.entities(scheme) {
                match entity.uuid() {
                    Some(uuid) => by_id
                        .entry(uuid.to_string())
                        .or_default()
                        .push((scheme, entity.key.clone())),
                    None => report.missing += 1,
                }
            }
        }

        self.cache.clear()?;
        for (short_id, mut entities) in by_id {
            if entities.len() > 1 {
                warn!("Duplicate uuid {} on {:?}; not cached", short_id, entities);
                entities.sort();
                report.duplicates.push(DuplicateEntry { short_id, entities });
                continue;
            }
            if let Some((scheme, key)) = entities.pop() {
                self.cache.set(&short_id, &key)?;
                match scheme {
                    Scheme::Page => report.pages += 1,
                    _ => report.files += 1,
                }
            }
        }

        debug!(
            "Reindexed {} pages, {} files ({} missing, {} duplicates)",
            report.pages,
            report.files,
            report.missing,
            report.duplicates.len()
        );
        Ok(report)
    }

    /// Drops the cache entry for a page or file identifier.
    ///
    /// Hosts call this when they move, rename or delete the entity.
    pub fn forget(&self, identifier: &Identifier) -> ResolveResult<bool> {
        if !identifier.scheme().is_generated() {
            return Ok(false);
        }
        Ok(self.cache.remove(identifier.short_id())?)
    }

    fn fetch(&self, scheme: Scheme, key: &str) -> Option<ContentRef> {
        match scheme {
            Scheme::Site => Some(self.store.site()),
            Scheme::Page => self.store.page(key),
            Scheme::File => self.store.file(key),
            Scheme::User => self.store.user(key),
        }
    }

    fn lookup(&self, identifier: &Identifier) -> ResolveResult<ContentRef> {
        let scheme = identifier.scheme();
        let short_id = identifier.short_id();

        if let Some(entity) = self.from_cache(scheme, short_id) {
            debug!("Cache hit for {}", identifier);
            return Ok(entity);
        }

        debug!("Cache miss for {}, scanning index", identifier);
        let key = self
            .scanner()
            .find(scheme, short_id)?
            .ok_or_else(|| ResolveError::NotFound(identifier.clone()))?;
        let entity = self
            .fetch(scheme, &key)
            .ok_or_else(|| ResolveError::NotFound(identifier.clone()))?;

        if self.config.populate_cache_on_miss {
            self.remember(short_id, &key);
        }
        Ok(entity)
    }

    /// A cache hit is only trusted if the store still has an entity at that
    /// key carrying the same short id.
    fn from_cache(&self, scheme: Scheme, short_id: &str) -> Option<ContentRef> {
        let key = match self.cache.get(short_id) {
            Ok(Some(key)) => key,
            Ok(None) => return None,
            Err(err) => {
                warn!("Lookup cache read failed for {}: {}", short_id, err);
                return None;
            }
        };

        if let Some(entity) = self.fetch(scheme, &key) {
            if entity.uuid() == Some(short_id) {
                return Some(entity);
            }
        }

        // The shared namespace means the entry may be a valid hit for the
        // other kind; only a key no kind answers to is stale.
        let live = scheme
            .counterpart()
            .and_then(|other| self.fetch(other, &key))
            .is_some_and(|entity| entity.uuid() == Some(short_id));
        if !live && self.config.repair_stale_cache {
            debug!("Removing stale cache entry {} -> {}", short_id, key);
            if let Err(err) = self.cache.remove(short_id) {
                warn!("Failed to remove stale cache entry {}: {}", short_id, err);
            }
        }
        None
    }

    fn remember(&self, short_id: &str, key: &str) {
        if let Err(err) = self.cache.set(short_id, key) {
            warn!("Lookup cache write failed for {}: {}", short_id, err);
        }
    }

    /// Generates, persists and binds a new identifier for `entity`.
    ///
    /// The caller's handle may predate an id persisted by another operation,
    /// so the stored copy is checked first and its id wins.
    fn assign(&self, ctx: &ResolutionContext, entity: &ContentRef) -> ResolveResult<Binding> {
        if let Some(current) = self.fetch(entity.kind, &entity.key) {
            if let Some(identifier) = current.stored_identifier() {
                debug!("{} {} already carries {}", entity.kind, entity.key, identifier);
                return Ok(Binding {
                    identifier,
                    entity: current,
                });
            }
        }

        let short_id = self.generate(ctx)?;
        let identifier = Identifier::new(entity.kind, short_id);

        let entity = if self.config.persist_generated {
            let updated = self
                .store
                .write_uuid(entity.kind, &entity.key, identifier.short_id())?;
            self.remember(identifier.short_id(), &entity.key);
            updated
        } else {
            Arc::clone(entity)
        };

        debug!("Assigned {} to {} {}", identifier, entity.kind, entity.key);
        Ok(Binding { identifier, entity })
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

