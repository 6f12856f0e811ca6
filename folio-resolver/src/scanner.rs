//! Full linear scans over the content tree.
//!
//! This is the authoritative but expensive path: a lookup walks every page
//! and every file in the site. The lookup cache exists to avoid it.

use crate::{ResolveError, ResolveResult};
use folio_model::ContentRef;
use folio_storage::ContentStore;
use folio_types::Scheme;
use tracing::{debug, warn};

/// Scans pages or files for a matching "uuid" field.
pub struct IndexScanner<'a> {
    store: &'a dyn ContentStore,
}

impl<'a> IndexScanner<'a> {
    pub fn new(store: &'a dyn ContentStore) -> Self {
        Self { store }
    }

    /// Every entity of `scheme` reachable from the site.
    ///
    /// Pages: the whole tree, drafts included. Files: the site's own files
    /// plus the files of every page. Site and user schemes have no index.
    pub fn entities(&self, scheme: Scheme) -> Vec<ContentRef> {
        match scheme {
            Scheme::Page => self.store.pages(),
            Scheme::File => self.store.files(),
            Scheme::Site | Scheme::User => Vec::new(),
        }
    }

    /// All entities of `scheme` whose "uuid" equals `short_id`.
    pub fn matches(&self, scheme: Scheme, short_id: &str) -> Vec<ContentRef> {
        self.entities(scheme)
            .into_iter()
            .filter(|entity| entity.uuid() == Some(short_id))
            .collect()
    }

    /// Native key of the single entity of `scheme` carrying `short_id`.
    ///
    /// `Ok(None)` when nothing of that kind matches. Pages and files share one
    /// id namespace: if any other page or file also carries the id, this is a
    /// data integrity violation and fails with
    /// [`ResolveError::DuplicateIdentifier`] listing every key.
    pub fn find(&self, scheme: Scheme, short_id: &str) -> ResolveResult<Option<String>> {
        let mut found = self.matches(scheme, short_id);
        debug!("Index scan for {}://{} matched {}", scheme, short_id, found.len());
        if found.is_empty() {
            return Ok(None);
        }
        if let Some(other) = scheme.counterpart() {
            found.extend(self.matches(other, short_id));
        }

        match found.len() {
            1 => Ok(found.pop().map(|entity| entity.key.clone())),
            _ => {
                let mut keys: Vec<String> = found.iter().map(|entity| entity.key.clone()).collect();
                keys.sort();
                warn!("Duplicate {} uuid {} on {:?}", scheme, short_id, keys);
                Err(ResolveError::DuplicateIdentifier {
                    scheme,
                    short_id: short_id.to_string(),
                    keys,
                })
            }
        }
    }

    /// Whether any entity of `scheme` carries `short_id`.
    pub fn contains(&self, scheme: Scheme, short_id: &str) -> bool {
        self.entities(scheme)
            .iter()
            .any(|entity| entity.uuid() == Some(short_id))
    }
}
