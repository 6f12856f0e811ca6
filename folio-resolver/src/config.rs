//! Resolver configuration.

use serde::{Deserialize, Serialize};

/// Tunables for [`crate::Resolver`].
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Write `short id → native key` into the lookup cache after an index
    /// scan finds an entity the cache did not know.
    pub populate_cache_on_miss: bool,
    /// Drop cache entries that point at a missing entity or at one whose
    /// "uuid" no longer matches.
    pub repair_stale_cache: bool,
    /// Write freshly generated short ids back onto the entity.
    pub persist_generated: bool,
    /// Safety cap for the generate-and-verify loop.
    pub max_generation_attempts: u64,
}

impl ResolverConfig {
    pub const DEFAULT_MAX_GENERATION_ATTEMPTS: u64 = 1_000_000;

    /// Parses a config from JSON, filling in defaults for missing fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            populate_cache_on_miss: true,
            repair_stale_cache: true,
            persist_generated: true,
            max_generation_attempts: Self::DEFAULT_MAX_GENERATION_ATTEMPTS,
        }
    }
}
