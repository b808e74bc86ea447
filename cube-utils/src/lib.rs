//! Shared utility functions for the Cube dashboard crates.

/// Date utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::{Datelike, NaiveDate, NaiveDateTime};

    /// Date format used for explicit date ranges: "YYYY-MM-DD"
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Timestamp layouts the analytics API emits for time dimensions.
    const TIMESTAMP_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map_err(|_| DateError::InvalidDate(s.to_string()))
    }

    /// Parse a time dimension value such as "2024-01-01T00:00:00.000".
    ///
    /// A trailing `Z` is ignored, and a bare "YYYY-MM-DD" is read as midnight.
    pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, DateError> {
        let trimmed = s.trim().trim_end_matches('Z');
        for format in TIMESTAMP_FORMATS {
            if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(ts);
            }
        }
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| DateError::InvalidTimestamp(s.to_string()))
    }

    /// Calendar quarter (1-4) for a date.
    pub fn quarter_of<D: Datelike>(date: &D) -> u32 {
        (date.month() - 1) / 3 + 1
    }

    /// Check that `start` is not after `end`.
    pub fn ordered_range(start: NaiveDate, end: NaiveDate) -> Result<(NaiveDate, NaiveDate), DateError> {
        if start > end {
            return Err(DateError::InvertedRange {
                start: format_date(&start),
                end: format_date(&end),
            });
        }
        Ok((start, end))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::{NaiveDate, Timelike};

        #[test]
        fn test_parse_timestamp_variants() {
            let a = parse_timestamp("2024-03-05T00:00:00.000").unwrap();
            assert_eq!(a.date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());

            let b = parse_timestamp("2024-03-05T13:45:00Z").unwrap();
            assert_eq!(b.hour(), 13);

            let c = parse_timestamp("2024-03-05").unwrap();
            assert_eq!(c.hour(), 0);

            assert!(parse_timestamp("March 5th").is_err());
        }

        #[test]
        fn test_quarter_of() {
            let jan = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
            let jun = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
            let dec = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
            assert_eq!(quarter_of(&jan), 1);
            assert_eq!(quarter_of(&jun), 2);
            assert_eq!(quarter_of(&dec), 4);
        }

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
        }

        #[test]
        fn test_ordered_range_rejects_inverted() {
            let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
            let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            assert!(ordered_range(start, end).is_err());
            assert!(ordered_range(end, start).is_ok());
        }
    }
}

/// Error types
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum DateError {
        #[error("invalid date '{0}', expected YYYY-MM-DD")]
        InvalidDate(String),

        #[error("invalid timestamp '{0}'")]
        InvalidTimestamp(String),

        #[error("date range starts after it ends ({start} > {end})")]
        InvertedRange { start: String, end: String },
    }
}
