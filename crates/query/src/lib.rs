//! Launch Query - scan, filter and pagination layer for LaunchCore
//!
//! This crate turns launch queries into store-level scans and turns what
//! the store returns into canonical launches. It handles:
//! - Raw stored records with loosely typed attribute values
//! - Record normalization with per-record failure containment
//! - Filter predicates (substring, equality, inclusive ranges)
//! - Opaque pagination cursors keyed on the launch identifier
//! - The query façade (list, date range, filter, lookup, summary)
//! - Summary statistics
//!
//! # Architecture
//!
//! A query flows through:
//! 1. Request validated by the façade (`InvalidRange`, `InvalidParameter`)
//! 2. Predicate built by `build_predicate`
//! 3. Session opened through a `SessionFactory`, scan issued once
//! 4. Items normalized by `normalize_batch` (bad records logged, skipped)
//! 5. Launches sorted and packaged with the store's continuation
//!
//! The limit passed to a scan bounds the records the store examines, not
//! the matches returned; see [`service`].
//!
//! # Examples
//!
//! ```no_run
//! use launchcore_query::{LaunchQueryService, MemoryStore, RawRecord};
//!
//! # async fn run() -> Result<(), launchcore_query::QueryError> {
//! let store = MemoryStore::from_records(vec![RawRecord::new().with("launch_id", "1")]);
//! let service = LaunchQueryService::new(store);
//! let page = service.list(100, None).await?;
//! println!("{} launches, more: {}", page.count, page.has_more);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod cursor;
pub mod error;
pub mod filter;
pub mod memory;
pub mod normalize;
pub mod record;
pub mod service;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use cursor::{Continuation, Cursor};
pub use error::QueryError;
pub use filter::{build_predicate, date_condition, Condition, Operand, Predicate};
pub use memory::{MemorySession, MemoryStore};
pub use normalize::{normalize, normalize_batch, InvalidRecord, RecordDefect};
pub use record::{attr, RawRecord, RawValue};
pub use service::{
    sort_launches, validate_date_range, validate_filter, validate_limit, LaunchQueryService,
    SortOrder,
};
pub use stats::{summarize, SUMMARY_SCAN_LIMIT};
pub use store::{ScanOutput, ScanRequest, SessionFactory, StoreError, StoreSession};
