//! Continuation cursor for paged list endpoints

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque continuation token returned by a paged API.
///
/// An empty token is never constructed: the upstream treats it the same as an
/// absent one, so `from_token` folds both into `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(String);

impl PageCursor {
    /// Build a cursor from a raw `nextPageToken` value
    pub fn from_token(token: Option<String>) -> Option<Self> {
        token.filter(|t| !t.is_empty()).map(Self)
    }

    /// Get the raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
