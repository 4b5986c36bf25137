//! Store seam
//!
//! The query layer never talks to a concrete database. It opens a
//! [`StoreSession`] through a [`SessionFactory`] for each logical query,
//! issues its scan/get calls on it, and drops it when the query finishes,
//! whether it succeeded or not.

use async_trait::async_trait;
use thiserror::Error;

use crate::cursor::Cursor;
use crate::filter::Predicate;
use crate::record::RawRecord;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not reach the store or open a session
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected or failed a request
    #[error("Store request failed: {0}")]
    Request(String),

    /// The store answered with something we cannot interpret
    #[error("Malformed store response: {0}")]
    MalformedResponse(String),
}

/// One scan call
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    /// Maximum number of stored records to examine (not to return)
    pub limit: u32,
    /// Resume strictly after this record
    pub start_after: Option<Cursor>,
    /// Filter applied to examined records; `None` matches all
    pub predicate: Option<Predicate>,
}

impl ScanRequest {
    /// Unfiltered scan from the beginning
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            start_after: None,
            predicate: None,
        }
    }

    /// Resume after a cursor
    pub fn start_after(mut self, cursor: Option<Cursor>) -> Self {
        self.start_after = cursor;
        self
    }

    /// Apply a predicate
    pub fn with_predicate(mut self, predicate: Option<Predicate>) -> Self {
        self.predicate = predicate;
        self
    }
}

/// Result of one scan call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutput {
    /// Examined records that satisfied the predicate
    pub items: Vec<RawRecord>,
    /// Key of the last examined record when more data remains
    pub last_evaluated_key: Option<Cursor>,
}

/// An open connection to the launch table
#[async_trait]
pub trait StoreSession: Send + Sync {
    /// Scan the table
    async fn scan(&self, request: ScanRequest) -> Result<ScanOutput, StoreError>;

    /// Fetch one record by identifier
    async fn get_item(&self, id: &str) -> Result<Option<RawRecord>, StoreError>;
}

/// Opens store sessions
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Session type produced by this factory
    type Session: StoreSession;

    /// Open a session for one logical query
    async fn open(&self) -> Result<Self::Session, StoreError>;
}
