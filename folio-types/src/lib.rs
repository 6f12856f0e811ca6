//! Core identifier types for Folio.
//!
//! This crate defines the wire-visible form of a content reference,
//! `scheme://shortId`, and nothing else:
//! - [`Scheme`] — the closed set of entity kinds (site, page, file, user)
//! - [`Identifier`] — a typed scheme + short id pair
//! - [`parse`] / [`format`] — the raw string codec
//!
//! The short id is opaque here. How it is generated and what it resolves to
//! is the resolver's business.

mod ids;
mod scheme;

pub use ids::{format, parse, Identifier, DELIMITER};
pub use scheme::Scheme;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding identifiers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("identifier has no scheme: {0}")]
    MissingScheme(String),
}
