//! Lenient timestamp parsing.
//!
//! Rows arrive from several import paths, so timestamps may be RFC 3339,
//! SQLite `datetime('now')` output, or a bare calendar date.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a timestamp string, treating offset-less values as UTC.
///
/// Returns `None` for blank or unrecognised input.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Milliseconds since the epoch, with unparsable input mapped to 0.
pub fn timestamp_millis_or_zero(value: Option<&str>) -> i64 {
    value
        .and_then(parse_timestamp)
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_timestamp("2024-01-06T10:30:00+05:30").unwrap();
        assert_eq!(dt.hour(), 5);
        assert_eq!(dt.minute(), 0);
    }

    #[test]
    fn test_parse_sqlite_datetime() {
        let dt = parse_timestamp("2024-03-15 08:00:00").unwrap();
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn test_parse_bare_date() {
        let dt = parse_timestamp("2024-01-01").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert_eq!(timestamp_millis_or_zero(Some("nope")), 0);
        assert_eq!(timestamp_millis_or_zero(None), 0);
    }
}
