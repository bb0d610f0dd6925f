//! Calendar features from pickup timestamps
//!
//! Timestamps are taken as given: a trailing `UTC` marker or an RFC 3339
//! offset is accepted but never applied, so the wall-clock fields match the
//! raw file.

use crate::error::{FarecastError, Result};
use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Calendar decomposition of a timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalFeatures {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Monday = 0. Extracted for completeness; not part of the feature matrix.
    pub day_of_week: u32,
    pub hour: u32,
}

impl TemporalFeatures {
    pub fn extract(timestamp: &NaiveDateTime) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
            day: timestamp.day(),
            day_of_week: timestamp.weekday().num_days_from_monday(),
            hour: timestamp.hour(),
        }
    }
}

/// Parse a pickup timestamp such as `2009-06-15 17:26:21 UTC`.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let trimmed = raw.trim();
    let naive = trimmed.strip_suffix("UTC").map(str::trim_end).unwrap_or(trimmed);

    for format in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(naive, format) {
            return Ok(ts);
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|ts| ts.naive_local())
        .map_err(|_| FarecastError::InvalidTimestamp(raw.to_string()))
}

/// Parse and decompose in one step.
pub fn extract(raw: &str) -> Result<TemporalFeatures> {
    parse_timestamp(raw).map(|ts| TemporalFeatures::extract(&ts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_raw_format() {
        let features = extract("2009-06-15 17:26:21 UTC").unwrap();
        assert_eq!(features.year, 2009);
        assert_eq!(features.month, 6);
        assert_eq!(features.day, 15);
        assert_eq!(features.hour, 17);
        // 2009-06-15 was a Monday
        assert_eq!(features.day_of_week, 0);
    }

    #[test]
    fn test_alternative_formats() {
        let a = parse_timestamp("2012-04-21 04:30:42").unwrap();
        let b = parse_timestamp("2012-04-21T04:30:42").unwrap();
        assert_eq!(a, b);

        let saturday = TemporalFeatures::extract(&a);
        assert_eq!(saturday.day_of_week, 5);
    }

    #[test]
    fn test_offset_is_not_applied() {
        let features = extract("2010-01-05T16:52:16+05:00").unwrap();
        assert_eq!(features.hour, 16);
        assert_eq!(features.day, 5);
    }

    #[test]
    fn test_invalid_timestamp() {
        assert!(matches!(
            parse_timestamp("not a date"),
            Err(FarecastError::InvalidTimestamp(_))
        ));
        assert!(parse_timestamp("2011-13-40 25:00:00 UTC").is_err());
    }
}
