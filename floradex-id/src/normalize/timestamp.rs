//! Timestamp normalization for upstream date fields
//!
//! The invasive-species layer encodes `LAST_UPDATE` inconsistently across
//! records: epoch milliseconds, epoch seconds, ISO-8601 strings, a wrapped
//! `Date(<millis>)` form, and several sentinel values meaning "no date".
//! Everything funnels through [`normalize`], which yields a canonical
//! `YYYY-MM-DD` string or empty, and never fails.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Upstream sentinel strings meaning "no usable date"
const SENTINELS: [&str; 6] = ["0", "0.0", "NaT", "None", "nan", "null"];

/// Dates before this year are treated as sentinel epoch values, not data
const MIN_PLAUSIBLE_YEAR: i32 = 1980;

/// Magnitude above which a numeric value is epoch milliseconds
const EPOCH_MILLIS_THRESHOLD: f64 = 1e11;

/// Magnitude above which a numeric value is epoch seconds
const EPOCH_SECONDS_THRESHOLD: f64 = 1e9;

static DATE_WRAPPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Date\((\d+)\)$").unwrap());

/// Normalize a raw date value into `YYYY-MM-DD`, or empty when unusable
///
/// Pure and total: for any input this returns a string, never an error.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || SENTINELS.contains(&trimmed) {
        return String::new();
    }

    let unwrapped = match DATE_WRAPPER.captures(trimmed).and_then(|c| c.get(1)) {
        Some(digits) => digits.as_str(),
        None => trimmed,
    };

    if let Ok(value) = unwrapped.parse::<f64>() {
        let parsed = if value.abs() > EPOCH_MILLIS_THRESHOLD {
            Utc.timestamp_millis_opt(value as i64).single()
        } else if value.abs() > EPOCH_SECONDS_THRESHOLD {
            Utc.timestamp_opt(value as i64, 0).single()
        } else {
            // Small numbers are not epochs; let generic parsing reject them
            return parse_generic(unwrapped);
        };
        return match parsed {
            Some(dt) => format_guarded(dt.date_naive()),
            None => String::new(),
        };
    }

    parse_generic(unwrapped)
}

/// Normalize a JSON attribute value; non-string, non-numeric inputs yield empty
pub fn normalize_json(value: &Value) -> String {
    match value {
        Value::String(s) => normalize(s),
        Value::Number(n) => normalize(&n.to_string()),
        _ => String::new(),
    }
}

/// Generic string date parsing: RFC 3339 first, then common formats
fn parse_generic(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return format_guarded(dt.date_naive());
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return format_guarded(dt.date());
        }
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return format_guarded(date);
        }
    }

    String::new()
}

/// Format a date, rejecting implausibly early years
fn format_guarded(date: NaiveDate) -> String {
    if date.year() < MIN_PLAUSIBLE_YEAR {
        return String::new();
    }
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_and_sentinels() {
        for raw in ["", "  ", "0", "0.0", "NaT", "None", "nan", "null"] {
            assert_eq!(normalize(raw), "", "sentinel {:?} should be empty", raw);
        }
    }

    #[test]
    fn test_epoch_milliseconds() {
        assert_eq!(normalize("1609459200000"), "2021-01-01");
    }

    #[test]
    fn test_epoch_seconds() {
        assert_eq!(normalize("1609459200"), "2021-01-01");
    }

    #[test]
    fn test_iso_8601() {
        assert_eq!(normalize("2021-01-01T00:00:00Z"), "2021-01-01");
        assert_eq!(normalize("2021-01-01"), "2021-01-01");
    }

    #[test]
    fn test_wrapped_numeric() {
        assert_eq!(normalize("Date(1609459200000)"), "2021-01-01");
    }

    #[test]
    fn test_implausibly_early_year_is_rejected() {
        assert_eq!(normalize("1970-01-02"), "");
        assert_eq!(normalize("1100000000"), "2004-11-09");
    }

    #[test]
    fn test_small_numbers_are_not_epochs() {
        assert_eq!(normalize("2021"), "");
        assert_eq!(normalize("12345"), "");
    }

    #[test]
    fn test_garbage_never_panics() {
        for raw in ["next tuesday", "Date()", "Date(abc)", "--", "NaN-NaN-NaN", "99999999999999999999"] {
            let _ = normalize(raw);
        }
        assert_eq!(normalize("next tuesday"), "");
    }

    #[test]
    fn test_json_values() {
        assert_eq!(normalize_json(&json!(1609459200000i64)), "2021-01-01");
        assert_eq!(normalize_json(&json!("Date(1609459200000)")), "2021-01-01");
        assert_eq!(normalize_json(&Value::Null), "");
        assert_eq!(normalize_json(&json!(["not", "a", "date"])), "");
    }
}
