//! ISO-8601 timestamp parsing and canonical formatting.
//!
//! Stored launch dates and caller-supplied bounds are compared as strings
//! by the store, so every bound handed to a predicate must use the same
//! canonical rendering as the stored values: RFC 3339 with a numeric
//! offset (`2024-01-01T00:00:00+00:00`).

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 (with `Z` or a numeric offset), naive date-times, and
/// bare dates. Values without an offset are taken to be UTC; bare dates
/// become midnight UTC.
pub fn parse_iso8601(input: &str) -> Option<DateTime<FixedOffset>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt);
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Render a timestamp in canonical form, e.g. `2020-08-07T05:12:00+00:00`.
///
/// The instant is shifted to UTC first, so string order of canonical forms
/// is chronological order.
pub fn to_canonical(dt: &DateTime<FixedOffset>) -> String {
    dt.with_timezone(&Utc)
        .fixed_offset()
        .to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Serde adapter for required timestamps.
pub mod iso8601 {
    use chrono::{DateTime, FixedOffset};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    /// Serialize in canonical form.
    pub fn serialize<S: Serializer>(dt: &DateTime<FixedOffset>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::to_canonical(dt))
    }

    /// Deserialize leniently via [`super::parse_iso8601`].
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<FixedOffset>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_iso8601(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid ISO-8601 datetime '{raw}'")))
    }
}

/// Serde adapter for optional timestamps.
pub mod iso8601_option {
    use chrono::{DateTime, FixedOffset};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    /// Serialize in canonical form, `null` when absent.
    pub fn serialize<S: Serializer>(
        dt: &Option<DateTime<FixedOffset>>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => s.serialize_str(&super::to_canonical(dt)),
            None => s.serialize_none(),
        }
    }

    /// Deserialize leniently; `null` maps to `None`.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<FixedOffset>>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|value| {
            super::parse_iso8601(&value)
                .ok_or_else(|| D::Error::custom(format!("invalid ISO-8601 datetime '{value}'")))
        })
        .transpose()
    }
}
