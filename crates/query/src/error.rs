//! Query errors

use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by the query façade
///
/// Malformed stored records never appear here; they are skipped during
/// normalization. A missing launch is `Ok(None)`, not an error.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Inverted date or flight-number range; the store was not queried
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Out-of-range request parameter; the store was not queried
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Failure talking to the backing store
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QueryError {
    /// True for errors caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            QueryError::InvalidRange(_) | QueryError::InvalidParameter(_)
        )
    }
}
