//! # Calendar Date Parsing
//!
//! Date fields carry ISO strings. Accepted forms:
//!
//! - `YYYY-MM-DD`
//! - RFC 3339 date-times (`2024-06-01T10:00:00Z`, `...+02:00`); the date
//!   is taken in UTC
//! - `YYYY-MM-DDTHH:MM[:SS]` without an offset; the date part is used
//!
//! Comparisons are on calendar dates, never instants.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse an ISO date or date-time into a calendar date.
pub fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.date())
}
