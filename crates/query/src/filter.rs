//! Filter predicates
//!
//! A [`Predicate`] is a conjunction of [`Condition`]s over stored
//! attributes. It is plain data so each store can either evaluate it
//! in-process ([`Predicate::matches`]) or render it into its own filter
//! language. Evaluation follows the managed store's rules: a missing
//! attribute or a type mismatch makes a condition false, strings compare
//! byte-wise, numbers compare numerically.
//!
//! Date bounds are compared against the stored ISO-8601 strings, so they
//! are rendered with [`to_canonical`] before they enter a predicate.

use chrono::{DateTime, FixedOffset};
use launchcore_core::timestamp::to_canonical;
use launchcore_core::FilterRequest;
use std::cmp::Ordering;

use crate::record::{attr, RawRecord, RawValue};

/// A typed comparison operand
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// String operand
    Str(String),
    /// Integer operand
    Int(i64),
}

impl Operand {
    /// Ordering of the stored value relative to this operand.
    fn compare(&self, value: &RawValue) -> Option<Ordering> {
        match (value, self) {
            (RawValue::String(stored), Operand::Str(operand)) => {
                Some(stored.as_bytes().cmp(operand.as_bytes()))
            }
            (RawValue::Number(_), Operand::Int(operand)) => {
                value.as_f64()?.partial_cmp(&(*operand as f64))
            }
            _ => None,
        }
    }
}

/// A single test against one attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// String attribute contains the substring (or list contains the element)
    Contains {
        /// Attribute name
        attribute: &'static str,
        /// Case-sensitive needle
        needle: String,
    },
    /// Attribute equals the operand
    Equals {
        /// Attribute name
        attribute: &'static str,
        /// Expected value
        value: Operand,
    },
    /// `low <= attribute <= high`
    Between {
        /// Attribute name
        attribute: &'static str,
        /// Inclusive lower bound
        low: Operand,
        /// Inclusive upper bound
        high: Operand,
    },
    /// `attribute >= bound`
    AtLeast {
        /// Attribute name
        attribute: &'static str,
        /// Inclusive bound
        bound: Operand,
    },
    /// `attribute <= bound`
    AtMost {
        /// Attribute name
        attribute: &'static str,
        /// Inclusive bound
        bound: Operand,
    },
}

impl Condition {
    /// Attribute this condition reads
    pub fn attribute(&self) -> &'static str {
        match self {
            Condition::Contains { attribute, .. }
            | Condition::Equals { attribute, .. }
            | Condition::Between { attribute, .. }
            | Condition::AtLeast { attribute, .. }
            | Condition::AtMost { attribute, .. } => attribute,
        }
    }

    /// Evaluate against a stored record
    pub fn matches(&self, record: &RawRecord) -> bool {
        let Some(value) = record.get(self.attribute()) else {
            return false;
        };

        match self {
            Condition::Contains { needle, .. } => match value {
                RawValue::String(s) => s.contains(needle.as_str()),
                RawValue::List(items) => items
                    .iter()
                    .any(|item| item.as_str() == Some(needle.as_str())),
                _ => false,
            },
            Condition::Equals { value: operand, .. } => {
                operand.compare(value) == Some(Ordering::Equal)
            }
            Condition::Between { low, high, .. } => {
                matches!(
                    low.compare(value),
                    Some(Ordering::Greater | Ordering::Equal)
                ) && matches!(high.compare(value), Some(Ordering::Less | Ordering::Equal))
            }
            Condition::AtLeast { bound, .. } => {
                matches!(bound.compare(value), Some(Ordering::Greater | Ordering::Equal))
            }
            Condition::AtMost { bound, .. } => {
                matches!(bound.compare(value), Some(Ordering::Less | Ordering::Equal))
            }
        }
    }
}

/// Conjunction of conditions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    conditions: Vec<Condition>,
}

impl Predicate {
    /// Predicate with a single condition
    pub fn new(condition: Condition) -> Self {
        Self {
            conditions: vec![condition],
        }
    }

    /// Conditions in the order they were added
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// True when there is nothing to test
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// True when every condition holds
    pub fn matches(&self, record: &RawRecord) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Range condition from optional inclusive bounds. Unset bounds impose no
/// constraint.
fn range_condition(
    attribute: &'static str,
    low: Option<Operand>,
    high: Option<Operand>,
) -> Option<Condition> {
    match (low, high) {
        (Some(low), Some(high)) => Some(Condition::Between {
            attribute,
            low,
            high,
        }),
        (Some(bound), None) => Some(Condition::AtLeast { attribute, bound }),
        (None, Some(bound)) => Some(Condition::AtMost { attribute, bound }),
        (None, None) => None,
    }
}

/// Date condition over the stored ISO-8601 launch date.
pub fn date_condition(
    start: Option<&DateTime<FixedOffset>>,
    end: Option<&DateTime<FixedOffset>>,
) -> Option<Condition> {
    range_condition(
        attr::LAUNCH_DATE,
        start.map(|d| Operand::Str(to_canonical(d))),
        end.map(|d| Operand::Str(to_canonical(d))),
    )
}

/// Build the predicate for a filter request.
///
/// Returns `None` (match all) when no criterion is set. Range ordering is
/// not validated here.
pub fn build_predicate(request: &FilterRequest) -> Option<Predicate> {
    let mut conditions = Vec::new();

    if let Some(needle) = non_empty(&request.mission_name) {
        conditions.push(Condition::Contains {
            attribute: attr::MISSION_NAME,
            needle: needle.to_string(),
        });
    }
    if let Some(needle) = non_empty(&request.rocket_name) {
        conditions.push(Condition::Contains {
            attribute: attr::ROCKET_NAME,
            needle: needle.to_string(),
        });
    }
    if let Some(status) = request.status {
        conditions.push(Condition::Equals {
            attribute: attr::STATUS,
            value: Operand::Str(status.as_str().to_string()),
        });
    }
    if let Some(needle) = non_empty(&request.launch_site) {
        conditions.push(Condition::Contains {
            attribute: attr::LAUNCH_SITE,
            needle: needle.to_string(),
        });
    }
    conditions.extend(date_condition(
        request.start_date.as_ref(),
        request.end_date.as_ref(),
    ));
    conditions.extend(range_condition(
        attr::FLIGHT_NUMBER,
        request.flight_number_min.map(Operand::Int),
        request.flight_number_max.map(Operand::Int),
    ));

    if conditions.is_empty() {
        None
    } else {
        Some(Predicate { conditions })
    }
}
