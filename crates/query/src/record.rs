//! Raw stored records
//!
//! A [`RawRecord`] is a launch item exactly as the table returns it: a map
//! of attribute names to loosely typed values. Numbers keep the store's
//! arbitrary-precision decimal text until [`RawValue::to_plain`] converts
//! them. Only the normalizer and predicate evaluation look inside.

use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Stored attribute names
pub mod attr {
    /// Partition key holding the launch identifier
    pub const LAUNCH_ID: &str = "launch_id";
    /// Mission name
    pub const MISSION_NAME: &str = "mission_name";
    /// Rocket name
    pub const ROCKET_NAME: &str = "rocket_name";
    /// ISO-8601 launch timestamp
    pub const LAUNCH_DATE: &str = "launch_date";
    /// Launch status string
    pub const STATUS: &str = "status";
    /// Free-text details
    pub const DETAILS: &str = "details";
    /// Flight number
    pub const FLIGHT_NUMBER: &str = "flight_number";
    /// Launch site name
    pub const LAUNCH_SITE: &str = "launch_site";
}

/// A loosely typed stored value
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// String attribute
    String(String),
    /// Number attribute as decimal text, e.g. `"99"` or `"1.5E3"`
    Number(String),
    /// Boolean attribute
    Bool(bool),
    /// List or set attribute
    List(Vec<RawValue>),
    /// Nested map attribute
    Map(BTreeMap<String, RawValue>),
    /// Explicit null
    Null,
}

impl RawValue {
    /// String contents, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value, if this is a number with valid decimal text
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Number(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// Convert to a plain JSON value, turning every decimal (at any depth)
    /// into a floating point number.
    ///
    /// Decimal text that does not parse, or that is not finite, becomes
    /// `null`.
    pub fn to_plain(&self) -> Value {
        match self {
            RawValue::String(s) => Value::String(s.clone()),
            RawValue::Number(_) => self
                .as_f64()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            RawValue::Bool(b) => Value::Bool(*b),
            RawValue::List(items) => Value::Array(items.iter().map(RawValue::to_plain).collect()),
            RawValue::Map(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_plain()))
                    .collect(),
            ),
            RawValue::Null => Value::Null,
        }
    }

    /// Build from a JSON value; numbers keep their textual form.
    pub fn from_json(value: &Value) -> RawValue {
        match value {
            Value::String(s) => RawValue::String(s.clone()),
            Value::Number(n) => RawValue::Number(n.to_string()),
            Value::Bool(b) => RawValue::Bool(*b),
            Value::Array(items) => RawValue::List(items.iter().map(RawValue::from_json).collect()),
            Value::Object(fields) => RawValue::Map(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), RawValue::from_json(v)))
                    .collect(),
            ),
            Value::Null => RawValue::Null,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::String(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(value.to_string())
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

/// One stored item
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: BTreeMap<String, RawValue>,
}

impl RawRecord {
    /// Empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set an attribute
    pub fn insert(&mut self, name: impl Into<String>, value: RawValue) {
        self.fields.insert(name.into(), value);
    }

    /// Look up an attribute
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.fields.get(name)
    }

    /// The launch identifier, when present as a string
    pub fn id(&self) -> Option<&str> {
        self.get(attr::LAUNCH_ID).and_then(RawValue::as_str)
    }

    /// Plain JSON object with decimals converted to floats
    pub fn to_plain(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_plain()))
            .collect()
    }

    /// Build from a JSON object. Returns `None` for non-object values.
    pub fn from_json(value: &Value) -> Option<RawRecord> {
        match RawValue::from_json(value) {
            RawValue::Map(fields) => Some(RawRecord { fields }),
            _ => None,
        }
    }
}

impl FromIterator<(String, RawValue)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (String, RawValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
