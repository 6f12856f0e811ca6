//! The `scheme://shortId` codec.
//!
//! The raw functions ([`parse`], [`format`]) work on plain strings and never
//! validate the short id. [`Identifier`] layers a typed [`Scheme`] on top.

use crate::{Error, Scheme};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Separator between scheme and short id.
pub const DELIMITER: &str = "://";

/// Splits a raw identifier on the first [`DELIMITER`].
///
/// Returns `(None, raw)` when there is no delimiter; the caller then has to
/// supply the scheme from context.
#[must_use]
pub fn parse(raw: &str) -> (Option<&str>, &str) {
    match raw.split_once(DELIMITER) {
        Some((scheme, short_id)) => (Some(scheme), short_id),
        None => (None, raw),
    }
}

/// Joins a scheme and a short id. Inverse of [`parse`].
#[must_use]
pub fn format(scheme: &str, short_id: &str) -> String {
    let mut raw = String::with_capacity(scheme.len() + DELIMITER.len() + short_id.len());
    raw.push_str(scheme);
    raw.push_str(DELIMITER);
    raw.push_str(short_id);
    raw
}

/// A content reference: a scheme plus an opaque short id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    scheme: Scheme,
    short_id: String,
}

impl Identifier {
    /// Creates an identifier from its parts.
    #[must_use]
    pub fn new(scheme: Scheme, short_id: impl Into<String>) -> Self {
        Self {
            scheme,
            short_id: short_id.into(),
        }
    }

    /// The identifier of the site singleton, `site://`.
    #[must_use]
    pub fn site() -> Self {
        Self::new(Scheme::Site, "")
    }

    /// Parses a full `scheme://shortId` string.
    pub fn parse(raw: &str) -> crate::Result<Self> {
        match parse(raw) {
            (Some(scheme), short_id) => Ok(Self::new(scheme.parse()?, short_id)),
            (None, _) => Err(Error::MissingScheme(raw.to_string())),
        }
    }

    /// Parses `raw`, falling back to `scheme` when it carries no prefix.
    ///
    /// An explicit prefix always wins over the fallback.
    pub fn parse_as(raw: &str, scheme: Scheme) -> crate::Result<Self> {
        match parse(raw) {
            (Some(explicit), short_id) => Ok(Self::new(explicit.parse()?, short_id)),
            (None, short_id) => Ok(Self::new(scheme, short_id)),
        }
    }

    /// Returns the scheme.
    #[must_use]
    pub const fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns the short id.
    #[must_use]
    pub fn short_id(&self) -> &str {
        &self.short_id
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.scheme, DELIMITER, self.short_id)
    }
}

impl FromStr for Identifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
