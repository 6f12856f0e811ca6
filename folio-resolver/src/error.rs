//! Error types for resolution.

use folio_storage::StorageError;
use folio_types::{Identifier, Scheme};
use thiserror::Error;

/// Result type for resolver operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Errors surfaced by the resolver. None are swallowed internally.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Nothing in the cache, the index or the user list answers to this id.
    #[error("no entity found for {0}")]
    NotFound(Identifier),

    /// The scheme is not one of site, page, file or user.
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// A raw identifier without `://` where no scheme could be inferred.
    #[error("identifier has no scheme: {0}")]
    MissingScheme(String),

    /// More than one entity carries the same short id.
    #[error("duplicate {scheme} identifier {short_id}: {}", .keys.join(", "))]
    DuplicateIdentifier {
        scheme: Scheme,
        short_id: String,
        keys: Vec<String>,
    },

    /// The generation safety cap was reached without finding a free id.
    #[error("no unique short id found after {attempts} attempts")]
    GenerationExhausted { attempts: u64 },

    /// The content store or the cache failed.
    #[error("storage error: {0}")]
    Store(#[from] StorageError),
}

impl ResolveError {
    /// Whether this is the recoverable "dangling reference" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<folio_types::Error> for ResolveError {
    fn from(err: folio_types::Error) -> Self {
        match err {
            folio_types::Error::UnsupportedScheme(scheme) => Self::UnsupportedScheme(scheme),
            folio_types::Error::MissingScheme(raw) => Self::MissingScheme(raw),
        }
    }
}
