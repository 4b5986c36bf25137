//! Integration tests for the launch query stack
//!
//! This test suite validates:
//! - Filter results satisfy every requested criterion
//! - Ordering rules for listings, filters and date ranges
//! - Cursor round-trips across a full pagination walk
//! - Per-record failure containment in mixed batches
//! - Request rejection before any store session is opened
//! - The HTTP surface end to end over an in-memory table

pub mod test_utils;

#[cfg(test)]
mod query_tests;

#[cfg(test)]
mod pagination_tests;

#[cfg(test)]
mod property_tests;
