//! Record date fields and lenient timestamp decoding.
//!
//! The backend hands dates back in several shapes: `timestamptz` columns come
//! as RFC 3339, `date` columns as `YYYY-MM-DD`, and older rows may hold
//! anything. Decoding never fails on a bad date; the field becomes `None` and
//! the record drops out of any bounded time window.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Which date a time-window filter reads from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    /// When an acquisition log entry was created.
    DateAdded,
    /// When an acquisition log entry was closed (sold out or deleted).
    DateRemoved,
    /// When a sale was made.
    SaleDate,
}

impl DateField {
    /// Column name in the backend tables.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::DateAdded => "date_added",
            Self::DateRemoved => "date_removed",
            Self::SaleDate => "sale_date",
        }
    }
}

impl std::fmt::Display for DateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// A record that carries one or more of the [`DateField`]s.
pub trait DatedRecord {
    /// The requested date, or `None` if the record lacks it, it failed to
    /// parse, or the record type has no such field.
    fn date_of(&self, field: DateField) -> Option<DateTime<Utc>>;

    /// Short identifier used in log messages about this record.
    fn describe(&self) -> String;
}

/// Parse a timestamp in any of the shapes the backend produces.
///
/// Naive timestamps and plain dates are taken as UTC; a plain date is
/// midnight.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    // Postgres text output for timestamptz, e.g. "2024-10-10 09:30:00+00".
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Serde adapter: decode an optional timestamp without ever failing.
///
/// Use with `#[serde(default, deserialize_with = "lenient_timestamp")]`.
///
/// # Errors
///
/// Only propagates errors from the underlying deserializer when the input is
/// not valid JSON-like data at all; unrecognised dates decode as `None`.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(raw)) => parse_timestamp(&raw),
        _ => None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "lenient_timestamp")]
        at: Option<DateTime<Utc>>,
    }

    fn decode(json: &str) -> Option<DateTime<Utc>> {
        serde_json::from_str::<Row>(json).unwrap().at
    }

    #[test]
    fn test_parse_rfc3339() {
        let expected = Utc.with_ymd_and_hms(2024, 10, 10, 9, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-10-10T09:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-10-10T10:30:00+01:00"), Some(expected));
    }

    #[test]
    fn test_parse_naive_timestamp_as_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 10, 10, 9, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-10-10T09:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-10-10 09:30:00.000"), Some(expected));
    }

    #[test]
    fn test_parse_plain_date_is_midnight_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 10, 10, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-10-10"), Some(expected));
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-45"), None);
    }

    #[test]
    fn test_lenient_decoding_never_fails() {
        assert!(decode(r#"{"at": "2024-10-10"}"#).is_some());
        assert_eq!(decode(r#"{"at": null}"#), None);
        assert_eq!(decode(r#"{"at": "not a date"}"#), None);
        assert_eq!(decode(r#"{"at": 1728547200}"#), None);
        assert_eq!(decode("{}"), None);
    }
}
