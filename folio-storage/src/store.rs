//! The hierarchical content store boundary and an in-memory implementation.

use crate::{StorageError, StorageResult};
use folio_model::{ContentRef, Entity};
use folio_types::Scheme;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Read access to the site tree, plus the single write the resolver needs.
///
/// Native keys are opaque to callers; whatever a store hands out in
/// [`Entity::key`] must fetch the same entity back.
pub trait ContentStore: Send + Sync {
    /// The site singleton.
    fn site(&self) -> ContentRef;

    /// Every page in the tree, recursively, drafts included.
    fn pages(&self) -> Vec<ContentRef>;

    /// Files owned directly by `owner` (a page or the site).
    fn files_of(&self, owner: &Entity) -> Vec<ContentRef>;

    /// Every file in the tree: the site's own files plus the files of every
    /// page. Stores that can enumerate files directly should override this.
    fn files(&self) -> Vec<ContentRef> {
        let mut files = self.files_of(&self.site());
        for page in self.pages() {
            files.extend(self.files_of(&page));
        }
        files
    }

    /// Fetches a page by native key.
    fn page(&self, key: &str) -> Option<ContentRef>;

    /// Fetches a file by native key.
    fn file(&self, key: &str) -> Option<ContentRef>;

    /// Fetches a user by native key.
    fn user(&self, key: &str) -> Option<ContentRef>;

    /// Persists `uuid` as the "uuid" content field of a page or file and
    /// returns the updated entity.
    fn write_uuid(&self, kind: Scheme, key: &str, uuid: &str) -> StorageResult<ContentRef>;
}

#[derive(Debug, Clone)]
struct PageNode {
    entity: ContentRef,
    draft: bool,
}

#[derive(Debug, Clone)]
struct FileNode {
    /// Native key of the owning page; empty for site files.
    owner: String,
    entity: ContentRef,
}

#[derive(Debug)]
struct Tree {
    site: ContentRef,
    pages: BTreeMap<String, PageNode>,
    files: BTreeMap<String, FileNode>,
    users: BTreeMap<String, ContentRef>,
}

/// Thread-safe in-memory site tree.
///
/// Pages are keyed by slash-separated path; a page's parent is its path minus
/// the last segment. Files are keyed `<owner path>/<filename>`, or just the
/// filename for site files.
#[derive(Debug)]
pub struct MemoryStore {
    tree: RwLock<Tree>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Value::Object(Default::default()))
    }
}

fn file_key(owner: &str, filename: &str) -> String {
    if owner.is_empty() {
        filename.to_string()
    } else {
        format!("{owner}/{filename}")
    }
}

fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

/// Rewrites `key` from under `from` to under `to`, if it lives there.
fn rebase(key: &str, from: &str, to: &str) -> Option<String> {
    if key == from {
        return Some(to.to_string());
    }
    key.strip_prefix(from)
        .and_then(|rest| rest.strip_prefix('/'))
        .map(|rest| format!("{to}/{rest}"))
}

fn is_within(key: &str, root: &str) -> bool {
    rebase(key, root, root).is_some()
}

fn check_page_path(path: &str) -> StorageResult<()> {
    if path.is_empty() || path.starts_with('/') || path.ends_with('/') {
        return Err(StorageError::InvalidData(format!("invalid page path: {path:?}")));
    }
    Ok(())
}

impl MemoryStore {
    /// Creates an empty tree whose site carries `site_data`.
    pub fn new(site_data: Value) -> Self {
        Self {
            tree: RwLock::new(Tree {
                site: Arc::new(Entity::site(site_data)),
                pages: BTreeMap::new(),
                files: BTreeMap::new(),
                users: BTreeMap::new(),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Tree> {
        self.tree.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tree> {
        self.tree.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts (or replaces) a listed page. Its parent must already exist.
    pub fn insert_page(&self, path: &str, data: Value) -> StorageResult<ContentRef> {
        self.insert_page_node(path, data, false)
    }

    /// Inserts (or replaces) a draft page. Its parent must already exist.
    pub fn insert_draft(&self, path: &str, data: Value) -> StorageResult<ContentRef> {
        self.insert_page_node(path, data, true)
    }

    fn insert_page_node(&self, path: &str, data: Value, draft: bool) -> StorageResult<ContentRef> {
        check_page_path(path)?;
        let mut tree = self.write();
        let parent = parent_of(path);
        if !parent.is_empty() && !tree.pages.contains_key(parent) {
            return Err(StorageError::NotFound(format!("parent page {parent}")));
        }
        let entity = Arc::new(Entity::page(path, data));
        tree.pages.insert(
            path.to_string(),
            PageNode {
                entity: Arc::clone(&entity),
                draft,
            },
        );
        Ok(entity)
    }

    /// Inserts (or replaces) a file owned by the page at `owner`.
    pub fn insert_file(&self, owner: &str, filename: &str, data: Value) -> StorageResult<ContentRef> {
        if owner.is_empty() {
            return Err(StorageError::InvalidData(
                "page owner must not be empty; use insert_site_file".to_string(),
            ));
        }
        self.insert_file_node(owner, filename, data)
    }

    /// Inserts (or replaces) a file owned by the site.
    pub fn insert_site_file(&self, filename: &str, data: Value) -> StorageResult<ContentRef> {
        self.insert_file_node("", filename, data)
    }

    fn insert_file_node(&self, owner: &str, filename: &str, data: Value) -> StorageResult<ContentRef> {
        if filename.is_empty() || filename.contains('/') {
            return Err(StorageError::InvalidData(format!("invalid filename: {filename:?}")));
        }
        let mut tree = self.write();
        if !owner.is_empty() && !tree.pages.contains_key(owner) {
            return Err(StorageError::NotFound(format!("page {owner}")));
        }
        let key = file_key(owner, filename);
        let entity = Arc::new(Entity::file(key.clone(), data));
        tree.files.insert(
            key,
            FileNode {
                owner: owner.to_string(),
                entity: Arc::clone(&entity),
            },
        );
        Ok(entity)
    }

    /// Inserts (or replaces) a user.
    pub fn insert_user(&self, key: &str, data: Value) -> ContentRef {
        let entity = Arc::new(Entity::user(key, data));
        self.write().users.insert(key.to_string(), Arc::clone(&entity));
        entity
    }

    /// Whether the page at `path` is a draft. `None` if there is no such page.
    pub fn is_draft(&self, path: &str) -> Option<bool> {
        self.read().pages.get(path).map(|node| node.draft)
    }

    /// Direct children of `parent` (empty string for top-level pages).
    pub fn children(&self, parent: &str) -> Vec<ContentRef> {
        self.read()
            .pages
            .iter()
            .filter(|(path, _)| parent_of(path) == parent)
            .map(|(_, node)| Arc::clone(&node.entity))
            .collect()
    }

    /// Moves a page, its descendants and all their files to a new path.
    ///
    /// Content fields, including "uuid", travel with the entities; only
    /// native keys change.
    pub fn move_page(&self, from: &str, to: &str) -> StorageResult<()> {
        check_page_path(to)?;
        let mut tree = self.write();
        if !tree.pages.contains_key(from) {
            return Err(StorageError::NotFound(format!("page {from}")));
        }
        if tree.pages.contains_key(to) {
            return Err(StorageError::InvalidData(format!("page {to} already exists")));
        }
        if is_within(to, from) {
            return Err(StorageError::InvalidData(format!(
                "cannot move {from} into its own subtree"
            )));
        }
        let parent = parent_of(to);
        if !parent.is_empty() && !tree.pages.contains_key(parent) {
            return Err(StorageError::NotFound(format!("parent page {parent}")));
        }

        let moved_pages: Vec<String> = tree
            .pages
            .keys()
            .filter(|path| is_within(path, from))
            .cloned()
            .collect();
        for old in moved_pages {
            if let (Some(node), Some(new)) = (tree.pages.remove(&old), rebase(&old, from, to)) {
                let entity = Entity::page(new.clone(), node.entity.data.clone());
                tree.pages.insert(
                    new,
                    PageNode {
                        entity: Arc::new(entity),
                        draft: node.draft,
                    },
                );
            }
        }

        let moved_files: Vec<String> = tree
            .files
            .iter()
            .filter(|(_, node)| !node.owner.is_empty() && is_within(&node.owner, from))
            .map(|(key, _)| key.clone())
            .collect();
        for old in moved_files {
            if let Some(node) = tree.files.remove(&old) {
                let owner = rebase(&node.owner, from, to).unwrap_or(node.owner);
                let key = file_key(&owner, node.entity.filename());
                let entity = Entity::file(key.clone(), node.entity.data.clone());
                tree.files.insert(
                    key,
                    FileNode {
                        owner,
                        entity: Arc::new(entity),
                    },
                );
            }
        }

        debug!("Moved page {} to {}", from, to);
        Ok(())
    }

    /// Removes a page with its descendants and their files.
    pub fn remove_page(&self, path: &str) -> StorageResult<()> {
        let mut tree = self.write();
        if !tree.pages.contains_key(path) {
            return Err(StorageError::NotFound(format!("page {path}")));
        }
        tree.pages.retain(|key, _| !is_within(key, path));
        tree.files
            .retain(|_, node| node.owner.is_empty() || !is_within(&node.owner, path));
        debug!("Removed page {}", path);
        Ok(())
    }

    /// Removes a single file.
    pub fn remove_file(&self, key: &str) -> StorageResult<()> {
        self.write()
            .files
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(format!("file {key}")))
    }
}

impl ContentStore for MemoryStore {
    fn site(&self) -> ContentRef {
        Arc::clone(&self.read().site)
    }

    fn pages(&self) -> Vec<ContentRef> {
        self.read()
            .pages
            .values()
            .map(|node| Arc::clone(&node.entity))
            .collect()
    }

    fn files_of(&self, owner: &Entity) -> Vec<ContentRef> {
        let owner_key = match owner.kind {
            Scheme::Site => "",
            Scheme::Page => owner.key.as_str(),
            Scheme::File | Scheme::User => return Vec::new(),
        };
        self.read()
            .files
            .values()
            .filter(|node| node.owner == owner_key)
            .map(|node| Arc::clone(&node.entity))
            .collect()
    }

    fn files(&self) -> Vec<ContentRef> {
        self.read()
            .files
            .values()
            .map(|node| Arc::clone(&node.entity))
            .collect()
    }

    fn page(&self, key: &str) -> Option<ContentRef> {
        self.read().pages.get(key).map(|node| Arc::clone(&node.entity))
    }

    fn file(&self, key: &str) -> Option<ContentRef> {
        self.read().files.get(key).map(|node| Arc::clone(&node.entity))
    }

    fn user(&self, key: &str) -> Option<ContentRef> {
        self.read().users.get(key).cloned()
    }

    fn write_uuid(&self, kind: Scheme, key: &str, uuid: &str) -> StorageResult<ContentRef> {
        let mut tree = self.write();
        let slot = match kind {
            Scheme::Page => tree.pages.get_mut(key).map(|node| &mut node.entity),
            Scheme::File => tree.files.get_mut(key).map(|node| &mut node.entity),
            Scheme::Site | Scheme::User => {
                return Err(StorageError::InvalidData(format!(
                    "{kind} entities do not store a uuid field"
                )));
            }
        };
        let slot = slot.ok_or_else(|| StorageError::NotFound(format!("{kind} {key}")))?;
        let updated = Arc::new((**slot).clone().with_uuid(uuid));
        *slot = Arc::clone(&updated);
        debug!("Wrote uuid {} to {} {}", uuid, kind, key);
        Ok(updated)
    }
}
