//! Launch query façade
//!
//! [`LaunchQueryService`] runs one logical query per call: open a store
//! session, build the predicate, scan once with the caller's cursor and
//! limit, normalize what comes back, sort, and package the page with its
//! continuation.
//!
//! # Scan limits
//!
//! Filters are evaluated by the store while it scans, and the limit is
//! applied to the records the store *examines*, not to the matches it
//! returns. A page can therefore hold fewer than `limit` launches (even
//! none) while `has_more` is true and more matches exist further along the
//! table. Clients collecting every match must keep following the cursor
//! until `has_more` is false.

use chrono::{DateTime, FixedOffset};
use launchcore_core::{FilterRequest, Launch, LaunchPage, LaunchSummary, MAX_LIMIT};
use tracing::{error, info, warn};

use crate::cursor::{Continuation, Cursor};
use crate::error::QueryError;
use crate::filter::{build_predicate, date_condition, Predicate};
use crate::normalize::{normalize, normalize_batch};
use crate::stats::{summarize, SUMMARY_SCAN_LIMIT};
use crate::store::{ScanRequest, SessionFactory, StoreSession};

/// Order of launches within a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Most recent launch first
    NewestFirst,
    /// Earliest launch first
    OldestFirst,
}

/// Sort launches by launch date. Equal dates keep their scan order.
pub fn sort_launches(launches: &mut [Launch], order: SortOrder) {
    match order {
        SortOrder::NewestFirst => launches.sort_by(|a, b| b.launch_date.cmp(&a.launch_date)),
        SortOrder::OldestFirst => launches.sort_by(|a, b| a.launch_date.cmp(&b.launch_date)),
    }
}

/// Check a page size against the accepted range.
pub fn validate_limit(limit: u32) -> Result<u32, QueryError> {
    if (1..=MAX_LIMIT).contains(&limit) {
        Ok(limit)
    } else {
        Err(QueryError::InvalidParameter(format!(
            "limit must be between 1 and {MAX_LIMIT}, got {limit}"
        )))
    }
}

/// Reject `start >= end`.
pub fn validate_date_range(
    start: &DateTime<FixedOffset>,
    end: &DateTime<FixedOffset>,
) -> Result<(), QueryError> {
    if start >= end {
        return Err(QueryError::InvalidRange(
            "start_date must be earlier than end_date".to_string(),
        ));
    }
    Ok(())
}

/// Validate every range and bound in a filter request.
pub fn validate_filter(request: &FilterRequest) -> Result<(), QueryError> {
    validate_limit(request.effective_limit())?;

    for (name, bound) in [
        ("flight_number_min", request.flight_number_min),
        ("flight_number_max", request.flight_number_max),
    ] {
        if let Some(value) = bound {
            if value < 1 {
                return Err(QueryError::InvalidParameter(format!(
                    "{name} must be at least 1, got {value}"
                )));
            }
        }
    }

    if let (Some(start), Some(end)) = (&request.start_date, &request.end_date) {
        validate_date_range(start, end)?;
    }
    if let (Some(min), Some(max)) = (request.flight_number_min, request.flight_number_max) {
        if min > max {
            return Err(QueryError::InvalidRange(
                "flight_number_min must not exceed flight_number_max".to_string(),
            ));
        }
    }
    Ok(())
}

/// Read-only query façade over a launch table
#[derive(Debug)]
pub struct LaunchQueryService<F> {
    factory: F,
}

impl<F: SessionFactory> LaunchQueryService<F> {
    /// Create a façade over a session factory
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    /// The underlying session factory
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// List launches, newest first.
    ///
    /// `limit` bounds the records examined; see the module docs.
    pub async fn list(&self, limit: u32, cursor: Option<Cursor>) -> Result<LaunchPage, QueryError> {
        let limit = validate_limit(limit)?;
        let page = self
            .scan_page("list", limit, cursor, None, SortOrder::NewestFirst)
            .await?;
        info!(count = page.count, has_more = page.has_more, "Retrieved launches");
        Ok(page)
    }

    /// List launches whose date lies in `[start, end]`, earliest first.
    pub async fn list_by_date_range(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        limit: u32,
        cursor: Option<Cursor>,
    ) -> Result<LaunchPage, QueryError> {
        validate_date_range(&start, &end)?;
        let limit = validate_limit(limit)?;

        let predicate = date_condition(Some(&start), Some(&end)).map(Predicate::new);
        let page = self
            .scan_page("date_range", limit, cursor, predicate, SortOrder::OldestFirst)
            .await?;
        info!(
            count = page.count,
            has_more = page.has_more,
            start = %start,
            end = %end,
            "Retrieved launches for date range"
        );
        Ok(page)
    }

    /// Filter launches, newest first.
    pub async fn filter(&self, request: &FilterRequest) -> Result<LaunchPage, QueryError> {
        validate_filter(request)?;

        let cursor = Cursor::from_token(request.last_evaluated_key.as_deref());
        let page = self
            .scan_page(
                "filter",
                request.effective_limit(),
                cursor,
                build_predicate(request),
                SortOrder::NewestFirst,
            )
            .await?;
        info!(count = page.count, has_more = page.has_more, "Filtered launches");
        Ok(page)
    }

    /// Look up one launch by identifier.
    ///
    /// A stored record that fails normalization is reported as absent.
    pub async fn get(&self, id: &str) -> Result<Option<Launch>, QueryError> {
        if id.is_empty() {
            return Ok(None);
        }

        let session = self.open("get").await?;
        let record = session.get_item(id).await.map_err(|err| {
            error!(launch_id = id, error = %err, "Error fetching launch by id");
            QueryError::from(err)
        })?;

        match record {
            Some(record) => match normalize(&record) {
                Ok(launch) => {
                    info!(launch_id = id, "Found launch");
                    Ok(Some(launch))
                }
                Err(err) => {
                    warn!(launch_id = id, error = %err, "Stored launch is malformed");
                    Ok(None)
                }
            },
            None => {
                info!(launch_id = id, "Launch not found");
                Ok(None)
            }
        }
    }

    /// Summary statistics over the first [`SUMMARY_SCAN_LIMIT`] records of
    /// an unfiltered, newest-first listing.
    pub async fn summary(&self) -> Result<LaunchSummary, QueryError> {
        let page = self.list(SUMMARY_SCAN_LIMIT, None).await?;
        Ok(summarize(&page.launches))
    }

    async fn open(&self, operation: &'static str) -> Result<F::Session, QueryError> {
        self.factory.open().await.map_err(|err| {
            error!(operation, error = %err, "Could not open store session");
            QueryError::from(err)
        })
    }

    async fn scan_page(
        &self,
        operation: &'static str,
        limit: u32,
        cursor: Option<Cursor>,
        predicate: Option<Predicate>,
        order: SortOrder,
    ) -> Result<LaunchPage, QueryError> {
        let session = self.open(operation).await?;
        let request = ScanRequest::new(limit)
            .start_after(cursor)
            .with_predicate(predicate);

        let output = session.scan(request).await.map_err(|err| {
            error!(operation, error = %err, "Error scanning launches");
            QueryError::from(err)
        })?;

        let mut launches = normalize_batch(&output.items);
        sort_launches(&mut launches, order);

        let continuation = Continuation::from_last_evaluated(output.last_evaluated_key);
        Ok(LaunchPage::new(launches, continuation.into_token()))
    }
}
