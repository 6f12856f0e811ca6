//! The closed set of identifier schemes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The entity-kind tag in front of an identifier.
///
/// Every kind has its own resolution strategy, so callers are expected to
/// `match` on this exhaustively rather than compare strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// The site singleton. Its short id is always empty.
    Site,
    /// A page anywhere in the tree, drafts included.
    Page,
    /// A file owned by a page or by the site.
    File,
    /// A user; the short id is the user's native key.
    User,
}

impl Scheme {
    /// All schemes, in declaration order.
    pub const ALL: [Scheme; 4] = [Scheme::Site, Scheme::Page, Scheme::File, Scheme::User];

    /// Returns the scheme's string form as it appears before `://`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Page => "page",
            Self::File => "file",
            Self::User => "user",
        }
    }

    /// Whether short ids of this scheme are generated and must be unique
    /// across the shared page + file namespace.
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        matches!(self, Self::Page | Self::File)
    }

    /// The other kind sharing this scheme's short id namespace.
    #[must_use]
    pub const fn counterpart(&self) -> Option<Scheme> {
        match self {
            Self::Page => Some(Self::File),
            Self::File => Some(Self::Page),
            Self::Site | Self::User => None,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "site" => Ok(Self::Site),
            "page" => Ok(Self::Page),
            "file" => Ok(Self::File),
            "user" => Ok(Self::User),
            other => Err(crate::Error::UnsupportedScheme(other.to_string())),
        }
    }
}
