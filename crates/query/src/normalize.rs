//! Record normalization
//!
//! Turns a [`RawRecord`] into a canonical [`Launch`]. Malformed records
//! are rejected one at a time with [`InvalidRecord`]; [`normalize_batch`]
//! logs and skips them so a single corrupt item never fails a page.

use launchcore_core::timestamp::parse_iso8601;
use launchcore_core::{Launch, LaunchStatus};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::record::{attr, RawRecord};

/// What is wrong with a stored record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordDefect {
    /// A required attribute is absent or null
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// An attribute holds the wrong kind of value
    #[error("field '{field}' must be a {expected}")]
    WrongType {
        /// Attribute name
        field: &'static str,
        /// Expected kind
        expected: &'static str,
    },

    /// The identifier is an empty string
    #[error("launch_id is empty")]
    EmptyIdentifier,

    /// The launch date does not parse as ISO-8601
    #[error("invalid launch_date '{0}'")]
    InvalidTimestamp(String),

    /// The status is not one of the known values
    #[error("unknown status '{0}'")]
    UnknownStatus(String),

    /// The flight number is fractional, not positive, or out of range
    #[error("invalid flight_number {0}")]
    InvalidFlightNumber(String),
}

/// A stored record that cannot become a [`Launch`]
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid record {}: {defect}", .id.as_deref().unwrap_or("<no id>"))]
pub struct InvalidRecord {
    /// Identifier of the offending record, when readable
    pub id: Option<String>,
    /// The defect found
    pub defect: RecordDefect,
}

/// Normalize one stored record.
pub fn normalize(record: &RawRecord) -> Result<Launch, InvalidRecord> {
    let fields = record.to_plain();
    let invalid = |defect: RecordDefect| InvalidRecord {
        id: record.id().map(str::to_string),
        defect,
    };

    let id = required_str(&fields, attr::LAUNCH_ID).map_err(invalid)?;
    if id.is_empty() {
        return Err(invalid(RecordDefect::EmptyIdentifier));
    }
    let mission_name = required_str(&fields, attr::MISSION_NAME).map_err(invalid)?;
    let rocket_name = required_str(&fields, attr::ROCKET_NAME).map_err(invalid)?;

    let raw_date = required_str(&fields, attr::LAUNCH_DATE).map_err(invalid)?;
    let launch_date = parse_iso8601(&raw_date)
        .ok_or_else(|| invalid(RecordDefect::InvalidTimestamp(raw_date.clone())))?;

    let raw_status = required_str(&fields, attr::STATUS).map_err(invalid)?;
    let status: LaunchStatus = raw_status
        .parse()
        .map_err(|_| invalid(RecordDefect::UnknownStatus(raw_status.clone())))?;

    let details = optional_str(&fields, attr::DETAILS).map_err(invalid)?;
    let launch_site = optional_str(&fields, attr::LAUNCH_SITE).map_err(invalid)?;
    let flight_number = flight_number(&fields).map_err(invalid)?;

    Ok(Launch {
        id,
        mission_name,
        rocket_name,
        launch_date,
        status,
        details,
        flight_number,
        launch_site,
    })
}

/// Normalize a batch, logging and dropping every invalid record.
pub fn normalize_batch<'a, I>(records: I) -> Vec<Launch>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    records
        .into_iter()
        .filter_map(|record| match normalize(record) {
            Ok(launch) => Some(launch),
            Err(err) => {
                warn!(error = %err, "Skipping invalid launch item");
                None
            }
        })
        .collect()
}

fn present<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    fields.get(name).filter(|v| !v.is_null())
}

fn required_str(fields: &Map<String, Value>, name: &'static str) -> Result<String, RecordDefect> {
    match present(fields, name) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(RecordDefect::WrongType {
            field: name,
            expected: "string",
        }),
        None => Err(RecordDefect::MissingField(name)),
    }
}

fn optional_str(
    fields: &Map<String, Value>,
    name: &'static str,
) -> Result<Option<String>, RecordDefect> {
    match present(fields, name) {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(RecordDefect::WrongType {
            field: name,
            expected: "string",
        }),
        None => Ok(None),
    }
}

fn flight_number(fields: &Map<String, Value>) -> Result<Option<u32>, RecordDefect> {
    let value = match present(fields, attr::FLIGHT_NUMBER) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => {
            return Err(RecordDefect::WrongType {
                field: attr::FLIGHT_NUMBER,
                expected: "number",
            })
        }
        None => return Ok(None),
    };

    match value {
        Some(n) if n.fract() == 0.0 && n >= 1.0 && n <= f64::from(u32::MAX) => Ok(Some(n as u32)),
        Some(n) => Err(RecordDefect::InvalidFlightNumber(n.to_string())),
        None => Err(RecordDefect::InvalidFlightNumber(
            present(fields, attr::FLIGHT_NUMBER)
                .map(Value::to_string)
                .unwrap_or_default(),
        )),
    }
}
