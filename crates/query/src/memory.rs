//! In-memory launch table
//!
//! [`MemoryStore`] keeps records ordered by identifier and scans them the
//! way the managed store does: resume strictly after the cursor, examine
//! at most `limit` records, return the ones that match, and report the
//! last examined key when more records follow.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::warn;

use crate::cursor::Cursor;
use crate::record::RawRecord;
use crate::store::{ScanOutput, ScanRequest, SessionFactory, StoreError, StoreSession};

/// Read-only in-process table keyed by launch identifier
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<BTreeMap<String, RawRecord>>,
    sessions_opened: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// Build a table. Records without a string `launch_id` cannot be keyed
    /// and are dropped.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut table = BTreeMap::new();
        for record in records {
            match record.id() {
                Some(id) => {
                    table.insert(id.to_string(), record);
                }
                None => warn!("Dropping record without launch_id from memory store"),
            }
        }
        Self {
            records: Arc::new(table),
            sessions_opened: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Build a table from a JSON array of items, as exported from the
    /// managed store. Numbers keep their decimal text.
    pub fn from_json(items: &Value) -> Result<Self, StoreError> {
        let items = items.as_array().ok_or_else(|| {
            StoreError::MalformedResponse("expected a JSON array of items".to_string())
        })?;
        let records = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                RawRecord::from_json(item).ok_or_else(|| {
                    StoreError::MalformedResponse(format!("item {i} is not a JSON object"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_records(records))
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the table is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sessions opened so far
    pub fn sessions_opened(&self) -> usize {
        self.sessions_opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionFactory for MemoryStore {
    type Session = MemorySession;

    async fn open(&self) -> Result<MemorySession, StoreError> {
        self.sessions_opened.fetch_add(1, Ordering::SeqCst);
        Ok(MemorySession {
            records: Arc::clone(&self.records),
        })
    }
}

/// Session over a [`MemoryStore`]
#[derive(Debug)]
pub struct MemorySession {
    records: Arc<BTreeMap<String, RawRecord>>,
}

#[async_trait]
impl StoreSession for MemorySession {
    async fn scan(&self, request: ScanRequest) -> Result<ScanOutput, StoreError> {
        if request.limit == 0 {
            return Err(StoreError::Request("limit must be at least 1".to_string()));
        }

        let lower = match &request.start_after {
            Some(cursor) => Bound::Excluded(cursor.as_str()),
            None => Bound::Unbounded,
        };
        let mut remaining = self
            .records
            .range::<str, _>((lower, Bound::Unbounded))
            .peekable();

        let mut items = Vec::new();
        let mut last_examined = None;
        for _ in 0..request.limit {
            let Some((id, record)) = remaining.next() else {
                break;
            };
            last_examined = Some(id);
            let keep = request
                .predicate
                .as_ref()
                .map_or(true, |predicate| predicate.matches(record));
            if keep {
                items.push(record.clone());
            }
        }

        let last_evaluated_key = if remaining.peek().is_some() {
            last_examined.map(|id| Cursor::after(id.as_str()))
        } else {
            None
        };

        Ok(ScanOutput {
            items,
            last_evaluated_key,
        })
    }

    async fn get_item(&self, id: &str) -> Result<Option<RawRecord>, StoreError> {
        Ok(self.records.get(id).cloned())
    }
}
