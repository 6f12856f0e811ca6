use folio_types::{Identifier, Scheme};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Name of the content field holding an entity's persisted short id.
pub const UUID_FIELD: &str = "uuid";

/// Shared handle to an entity. Two resolutions of the same identifier within
/// one context yield pointer-equal handles.
pub type ContentRef = Arc<Entity>;

/// A content entity as the hierarchical store exposes it.
///
/// `key` is the store's native key: empty for the site, the path for pages
/// (`blog/hello`), `<owner>/<filename>` for files and the user id for users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: Scheme,
    pub key: String,
    #[serde(default)]
    pub data: Value,
}

impl Entity {
    pub fn new(kind: Scheme, key: impl Into<String>, data: Value) -> Self {
        Self {
            kind,
            key: key.into(),
            data,
        }
    }

    /// The site singleton.
    pub fn site(data: Value) -> Self {
        Self::new(Scheme::Site, "", data)
    }

    pub fn page(key: impl Into<String>, data: Value) -> Self {
        Self::new(Scheme::Page, key, data)
    }

    pub fn file(key: impl Into<String>, data: Value) -> Self {
        Self::new(Scheme::File, key, data)
    }

    pub fn user(key: impl Into<String>, data: Value) -> Self {
        Self::new(Scheme::User, key, data)
    }

    /// Extract a string value from `data` using a JSON pointer (e.g., "/title").
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        self.data.pointer(pointer).and_then(|v| v.as_str())
    }

    /// The persisted short id, if any. An empty string counts as absent.
    pub fn uuid(&self) -> Option<&str> {
        self.data
            .get(UUID_FIELD)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Writes the short id into the content fields.
    ///
    /// Non-object `data` is replaced by an object holding only the id.
    pub fn set_uuid(&mut self, uuid: impl Into<String>) {
        if !self.data.is_object() {
            self.data = Value::Object(Map::new());
        }
        if let Value::Object(fields) = &mut self.data {
            fields.insert(UUID_FIELD.to_string(), Value::String(uuid.into()));
        }
    }

    /// Builder-style [`Entity::set_uuid`].
    #[must_use]
    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.set_uuid(uuid);
        self
    }

    /// The identifier this entity already carries, without generating one.
    ///
    /// `None` for pages and files that have no persisted short id yet.
    pub fn stored_identifier(&self) -> Option<Identifier> {
        match self.kind {
            Scheme::Site => Some(Identifier::site()),
            Scheme::User => Some(Identifier::new(Scheme::User, self.key.clone())),
            Scheme::Page | Scheme::File => self
                .uuid()
                .map(|uuid| Identifier::new(self.kind, uuid)),
        }
    }

    /// Filename component of a file key.
    pub fn filename(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}
