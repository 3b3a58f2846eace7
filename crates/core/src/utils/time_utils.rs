use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};

use crate::errors::{Result, ValidationError};

/// Parses a user supplied transaction date.
///
/// Accepts a full RFC 3339 timestamp or a bare `YYYY-MM-DD` date, which is
/// interpreted as midnight UTC.
pub fn parse_transaction_date(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|e| {
        ValidationError::InvalidInput(format!("Invalid transaction date '{}': {}", value, e))
    })?;
    Ok(start_of_day(date))
}

/// First instant of the given day in UTC.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Last representable microsecond of the given day in UTC.
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    let last = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&date.and_time(last))
}

/// Whether `instant` falls in the four-digit year range that
/// [`to_storage_timestamp`] keeps in chronological order.
pub fn is_storable_timestamp(instant: &DateTime<Utc>) -> bool {
    (0..=9999).contains(&instant.year())
}

/// Fixed-width RFC 3339 encoding. Lexicographic order of the output matches
/// chronological order, which the SQLite store relies on for range filters.
pub fn to_storage_timestamp(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Reads back a timestamp written by [`to_storage_timestamp`].
/// Falls back to the Unix epoch (and logs) when the text is not RFC 3339.
pub fn parse_storage_timestamp_tolerant(value: &str, field_name: &str) -> DateTime<Utc> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(e) => {
            log::error!(
                "Failed to parse {} '{}' as RFC 3339: {}. Falling back to epoch.",
                field_name,
                value,
                e
            );
            DateTime::<Utc>::default()
        }
    }
}
