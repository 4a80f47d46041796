//! Flexible date parser for record payloads and filter arguments.
//!
//! Supports:
//! - ISO date: `2026-02-07`
//! - ISO datetime: `2026-02-07T17:00:00`, `2026-02-07T17:00`
//! - RFC 3339 with offset: `2026-02-07T17:00:00Z`, `2026-02-07T17:00:00+05:30`
//! - Space separated: `2026-02-07 17:00:00`, `2026-02-07 17:00`
//! - Day-month-name: `07 Feb 2026`, `07-Feb-2026`, `7 February 2026`

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::record::FieldValue;

/// Error type for date parsing failures.
#[derive(Debug, Clone)]
pub struct DateParseError {
    pub input: String,
    pub message: String,
}

impl std::fmt::Display for DateParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse date '{}': {}", self.input, self.message)
    }
}

impl std::error::Error for DateParseError {}

/// Parse a date or datetime string into a [`FieldValue`].
///
/// Plain dates become `FieldValue::Date`; anything with a time component
/// becomes `FieldValue::DateTime`. Offsets are normalized to UTC.
///
/// ```
/// use gridview::util::parse_date_value;
/// use gridview::FieldValue;
///
/// let v = parse_date_value("07-Feb-2026").unwrap();
/// assert!(matches!(v, FieldValue::Date(_)));
/// ```
pub fn parse_date_value(input: &str) -> Result<FieldValue, DateParseError> {
    let input = input.trim();

    if let Some(date) = try_parse_iso_date(input) {
        return Ok(FieldValue::Date(date));
    }

    if let Some(dt) = try_parse_iso_datetime(input) {
        return Ok(FieldValue::DateTime(dt));
    }

    if let Some(dt) = try_parse_space_datetime(input) {
        return Ok(FieldValue::DateTime(dt));
    }

    if let Some(date) = try_parse_day_month_name(input) {
        return Ok(FieldValue::Date(date));
    }

    Err(DateParseError {
        input: input.to_string(),
        message: "Unrecognized format. Use: ISO date (2026-02-07), \
                  ISO datetime (2026-02-07T17:00:00), \
                  date time (2026-02-07 17:00), or 07 Feb 2026"
            .to_string(),
    })
}

fn try_parse_iso_date(input: &str) -> Option<NaiveDate> {
    if input.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

fn try_parse_iso_datetime(input: &str) -> Option<NaiveDateTime> {
    if !input.contains('T') {
        return None;
    }

    // With timezone first
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ndt);
    }

    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M").ok()
}

fn try_parse_space_datetime(input: &str) -> Option<NaiveDateTime> {
    if input.len() < 16 || input.as_bytes().get(10) != Some(&b' ') {
        return None;
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Some(ndt);
    }

    NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M").ok()
}

fn try_parse_day_month_name(input: &str) -> Option<NaiveDate> {
    // %b accepts both "Feb" and "February" when parsing
    let normalized = input.replace('-', " ");
    NaiveDate::parse_from_str(&normalized, "%d %b %Y").ok()
}
