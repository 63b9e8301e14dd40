use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::{Error, Result};

/// Which side of a time range a bound sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

// Millisecond UTC text, the precision the index compares instants at.
const BOUND_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Normalize a user-supplied time bound to a millisecond UTC timestamp.
///
/// The index compares bounds and record timestamps as instants, so stored
/// values may be naive or carry a `Z`/offset suffix. Accepted inputs:
/// - RFC 3339 (`2025-01-02T10:00:00+02:00`), shifted to UTC
/// - a naive date-time (`2025-01-02T10:00:00`), taken as UTC
/// - a bare date (`2025-01-02`), which expands to the whole day
pub fn parse_bound(input: &str, bound: Bound) -> Result<String> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.naive_utc().format(BOUND_FORMAT).to_string());
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.format(BOUND_FORMAT).to_string());
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let bounded = match bound {
            Bound::Start => date.and_hms_opt(0, 0, 0),
            Bound::End => date.and_hms_milli_opt(23, 59, 59, 999),
        }
        .ok_or_else(|| Error::InvalidFilter(format!("cannot bound day {}", input)))?;
        return Ok(bounded.format(BOUND_FORMAT).to_string());
    }

    Err(Error::InvalidFilter(format!(
        "'{}' is not a date (YYYY-MM-DD) or an RFC 3339 timestamp",
        input
    )))
}
