//! Cache key derivation.
//!
//! Readers and invalidating writers must build identical keys for the same
//! data, or invalidation silently misses. All keys are therefore built
//! here from a resource's [`Endpoints`], and nowhere else:
//!
//! - list: the collection path, `/api/booking`
//! - detail: `details + "/" + id`, only when the id is present
//! - scoped: `list + "/" + scope + "/" + value`
//! - query: the pair `(list, term)`, only when the term is present

use std::fmt;

use payloads::Endpoints;

/// Identifies one fetchable resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheKey {
    /// A plain GET of `path`.
    Path(String),
    /// A GET of `path?query=<term>`.
    Query { path: String, term: String },
}

impl CacheKey {
    pub fn list(endpoints: &Endpoints) -> Self {
        Self::Path(endpoints.list.to_string())
    }

    pub fn detail(endpoints: &Endpoints, id: &str) -> Option<Self> {
        present(id).map(|id| Self::Path(endpoints.detail_path(id)))
    }

    pub fn scoped(
        endpoints: &Endpoints,
        scope: &str,
        value: &str,
    ) -> Option<Self> {
        present(value).map(|value| Self::Path(endpoints.scoped_path(scope, value)))
    }

    pub fn query(endpoints: &Endpoints, term: &str) -> Option<Self> {
        present(term).map(|term| Self::Query {
            path: endpoints.list.to_string(),
            term: term.to_string(),
        })
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Path(path) | Self::Query { path, .. } => path,
        }
    }

    pub fn term(&self) -> Option<&str> {
        match self {
            Self::Path(_) => None,
            Self::Query { term, .. } => Some(term),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.write_str(path),
            Self::Query { path, term } => write!(f, "{path}?query={term}"),
        }
    }
}

fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(value)
}
