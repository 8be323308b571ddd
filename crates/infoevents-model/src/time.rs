use chrono::{DateTime, FixedOffset, Utc};

use crate::validation::ValidationError;

/// Parses an RFC 3339 timestamp, keeping the offset it was written with.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, ValidationError> {
    DateTime::parse_from_rfc3339(value.trim()).map_err(|_| ValidationError::PatternMismatch {
        field: "timestamp",
        value: value.to_string(),
    })
}

/// Parses an RFC 3339 timestamp and normalizes it to UTC.
pub fn parse_utc(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    parse_timestamp(value).map(|ts| ts.with_timezone(&Utc))
}
