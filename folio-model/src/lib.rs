//! Content entity model for Folio.
//!
//! Defines the value every layer passes around:
//! - [`Entity`] — one addressable piece of content (kind, native key, content fields)
//! - [`ContentRef`] — the shared handle stores hand out and resolvers memoize
//!
//! Content fields are arbitrary JSON. The only field this workspace
//! interprets is [`UUID_FIELD`].

mod entity;

pub use entity::{ContentRef, Entity, UUID_FIELD};
