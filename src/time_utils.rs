//! Time parsing for event queries.
//!
//! Users type times either as `YYYY-MM-DD HH:MM:SS` in local time or as
//! RFC3339. The API wants unix seconds rendered as decimal strings.

use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

/// Format used both for display and for naive user input.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default look-back window for event queries.
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

#[derive(Debug, Error, PartialEq)]
pub enum TimeError {
    #[error("invalid time format '{0}': expected 'YYYY-MM-DD HH:MM:SS' or RFC3339")]
    InvalidFormat(String),
    #[error("invalid start time format: {0}")]
    InvalidStart(Box<TimeError>),
    #[error("invalid end time format: {0}")]
    InvalidEnd(Box<TimeError>),
    #[error("start time must be before end time")]
    StartAfterEnd,
    #[error("a window of {0} hours is out of range")]
    WindowOutOfRange(i64),
}

/// Parse a single user-supplied time.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, TimeError> {
    let value = value.trim();

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, DISPLAY_FORMAT) {
        // a DST gap has no local mapping, an overlap takes the earlier one
        return Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| TimeError::InvalidFormat(value.to_string()));
    }

    DateTime::parse_from_rfc3339(value)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|_| TimeError::InvalidFormat(value.to_string()))
}

/// Parse and validate a query window. Equal bounds are allowed.
pub fn parse_time_parameters(
    start: &str,
    end: &str,
) -> Result<(DateTime<Utc>, DateTime<Utc>), TimeError> {
    let start = parse_timestamp(start).map_err(|e| TimeError::InvalidStart(Box::new(e)))?;
    let end = parse_timestamp(end).map_err(|e| TimeError::InvalidEnd(Box::new(e)))?;

    if start > end {
        return Err(TimeError::StartAfterEnd);
    }
    Ok((start, end))
}

/// The window ending at `now` and reaching `hours` back.
pub fn window_ending_at(
    now: DateTime<Utc>,
    hours: i64,
) -> Result<(DateTime<Utc>, DateTime<Utc>), TimeError> {
    let start = Duration::try_hours(hours)
        .and_then(|span| now.checked_sub_signed(span))
        .ok_or(TimeError::WindowOutOfRange(hours))?;
    Ok((start, now))
}

/// The last `hours` hours up to now.
pub fn last_hours(hours: i64) -> Result<(DateTime<Utc>, DateTime<Utc>), TimeError> {
    window_ending_at(Utc::now(), hours)
}

/// Render a point in time as a local `YYYY-MM-DD HH:MM:SS` string.
pub fn to_display(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format(DISPLAY_FORMAT).to_string()
}

/// Unix seconds as the API expects them.
pub fn to_unix_string(time: DateTime<Utc>) -> String {
    time.timestamp().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339() {
        let time = parse_timestamp("2025-05-18T14:59:25Z").unwrap();
        assert_eq!(time.timestamp(), 1747580365);

        let offset = parse_timestamp("2025-05-18T16:59:25+02:00").unwrap();
        assert_eq!(offset, time);
    }

    #[test]
    fn test_naive_is_local_time() {
        let time = parse_timestamp("2025-05-18 14:59:25").unwrap();
        assert_eq!(to_display(time), "2025-05-18 14:59:25");
    }

    #[test]
    fn test_invalid_formats() {
        for value in ["yesterday", "2025-05-18", "18/05/2025 14:59:25", ""] {
            assert!(matches!(
                parse_timestamp(value),
                Err(TimeError::InvalidFormat(_))
            ));
        }
    }

    #[test]
    fn test_window_order() {
        assert_eq!(
            parse_time_parameters("2025-05-18T15:00:00Z", "2025-05-18T14:00:00Z"),
            Err(TimeError::StartAfterEnd)
        );
        assert!(parse_time_parameters("2025-05-18T14:00:00Z", "2025-05-18T14:00:00Z").is_ok());
    }

    #[test]
    fn test_window_errors_name_the_bound() {
        let error = parse_time_parameters("nope", "2025-05-18T14:00:00Z").unwrap_err();
        assert!(error.to_string().starts_with("invalid start time format"));

        let error = parse_time_parameters("2025-05-18T14:00:00Z", "nope").unwrap_err();
        assert!(error.to_string().starts_with("invalid end time format"));
    }

    #[test]
    fn test_window_ending_at() {
        let now = parse_timestamp("2025-05-18T14:00:00Z").unwrap();
        let (start, end) = window_ending_at(now, 24).unwrap();
        assert_eq!(end, now);
        assert_eq!(to_unix_string(end).parse::<i64>().unwrap() - start.timestamp(), 86400);
    }

    #[test]
    fn test_oversized_window_is_rejected() {
        let now = parse_timestamp("2025-05-18T14:00:00Z").unwrap();
        for hours in [10_000_000_000, i64::MAX] {
            assert_eq!(
                window_ending_at(now, hours),
                Err(TimeError::WindowOutOfRange(hours))
            );
        }
        assert!(last_hours(0).is_ok());
    }
}
