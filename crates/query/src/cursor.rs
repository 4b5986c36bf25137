//! Pagination cursors
//!
//! The store paginates on the launch identifier, so a cursor is the
//! identifier of the last record the store examined. Callers treat it as
//! an opaque token and hand it back verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque scan resumption point
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Cursor positioned after the record with this identifier.
    pub fn after(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Accept a caller-supplied token. Empty tokens mean "start from the
    /// beginning".
    pub fn from_token(token: Option<&str>) -> Option<Self> {
        token.filter(|t| !t.is_empty()).map(Self::after)
    }

    /// Identifier the scan resumes after
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Token to return to the caller
    pub fn into_token(self) -> String {
        self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a page leaves the scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Continuation {
    /// Cursor for the next call, present only when more data remains
    pub next: Option<Cursor>,
}

impl Continuation {
    /// Build from the store's last-evaluated key.
    pub fn from_last_evaluated(last_evaluated: Option<Cursor>) -> Self {
        Self {
            next: last_evaluated,
        }
    }

    /// Whether the store reported more data
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }

    /// Token for the response body
    pub fn into_token(self) -> Option<String> {
        self.next.map(Cursor::into_token)
    }
}
