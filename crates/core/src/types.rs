//! Core types
//!
//! Launch records and the request/response values exchanged between the
//! HTTP surface and the query layer. All of them are transient values.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default page size when the caller does not pass one
pub const DEFAULT_LIMIT: u32 = 100;

/// Largest page size a caller may request
pub const MAX_LIMIT: u32 = 1000;

/// Outcome of a launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchStatus {
    /// Launch reached its intended orbit or objective
    Success,
    /// Launch failed
    Failed,
    /// Launch has not happened yet
    Upcoming,
}

impl LaunchStatus {
    /// All statuses, in reporting order
    pub const ALL: [LaunchStatus; 3] = [
        LaunchStatus::Success,
        LaunchStatus::Failed,
        LaunchStatus::Upcoming,
    ];

    /// Stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchStatus::Success => "success",
            LaunchStatus::Failed => "failed",
            LaunchStatus::Upcoming => "upcoming",
        }
    }
}

impl fmt::Display for LaunchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not one of the known values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown launch status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for LaunchStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(LaunchStatus::Success),
            "failed" => Ok(LaunchStatus::Failed),
            "upcoming" => Ok(LaunchStatus::Upcoming),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Canonical launch record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    /// Unique launch identifier (never empty)
    pub id: String,
    /// Mission name
    pub mission_name: String,
    /// Rocket name
    pub rocket_name: String,
    /// Launch date and time
    #[serde(with = "crate::timestamp::iso8601")]
    pub launch_date: DateTime<FixedOffset>,
    /// Launch outcome
    pub status: LaunchStatus,
    /// Free-text details
    pub details: Option<String>,
    /// Flight number (positive)
    pub flight_number: Option<u32>,
    /// Launch site name
    pub launch_site: Option<String>,
}

/// One page of launches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchPage {
    /// Launches on this page, in the order of the query that produced them
    pub launches: Vec<Launch>,
    /// Number of launches on this page
    pub count: usize,
    /// Cursor to pass back for the next page
    pub last_evaluated_key: Option<String>,
    /// Whether the scan has more records to examine
    pub has_more: bool,
}

impl LaunchPage {
    /// Build a page; `count` and `has_more` are derived.
    pub fn new(launches: Vec<Launch>, last_evaluated_key: Option<String>) -> Self {
        Self {
            count: launches.len(),
            has_more: last_evaluated_key.is_some(),
            launches,
            last_evaluated_key,
        }
    }
}

/// Structured filter request
///
/// Every criterion is optional; set criteria are combined with AND.
/// Empty strings are treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRequest {
    /// Substring of the mission name
    pub mission_name: Option<String>,
    /// Substring of the rocket name
    pub rocket_name: Option<String>,
    /// Exact status
    pub status: Option<LaunchStatus>,
    /// Inclusive lower date bound
    #[serde(with = "crate::timestamp::iso8601_option")]
    pub start_date: Option<DateTime<FixedOffset>>,
    /// Inclusive upper date bound
    #[serde(with = "crate::timestamp::iso8601_option")]
    pub end_date: Option<DateTime<FixedOffset>>,
    /// Substring of the launch site name
    pub launch_site: Option<String>,
    /// Inclusive lower flight-number bound
    pub flight_number_min: Option<i64>,
    /// Inclusive upper flight-number bound
    pub flight_number_max: Option<i64>,
    /// Maximum number of stored records to examine
    pub limit: Option<u32>,
    /// Cursor from a previous page
    pub last_evaluated_key: Option<String>,
}

impl FilterRequest {
    /// Limit to use, falling back to [`DEFAULT_LIMIT`]
    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

/// Launch count for one rocket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RocketUsage {
    /// Rocket name
    pub rocket_name: String,
    /// Number of launches
    pub count: usize,
}

/// Aggregate launch statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchSummary {
    /// Launches considered
    pub total_launches: usize,
    /// Launches with status `success`
    pub successful_launches: usize,
    /// Launches with status `failed`
    pub failed_launches: usize,
    /// Launches with status `upcoming`
    pub upcoming_launches: usize,
    /// Successful launches as a percentage of all launches, two decimals
    pub success_rate: f64,
    /// Up to five most used rockets
    pub most_used_rockets: Vec<RocketUsage>,
}
