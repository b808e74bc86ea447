//! Category label formatting.

use chrono::{Datelike, NaiveDateTime};
use cube_query::{Granularity, Value};
use cube_utils::dates::{parse_timestamp, quarter_of};

/// Label shown for a null grouping value.
pub const NULL_LABEL: &str = "∅";

/// Label used when a recipe has no label field.
pub const TOTAL_LABEL: &str = "Total";

/// Format a bucket start for display at the given granularity.
pub fn format_bucket(ts: &NaiveDateTime, granularity: Granularity) -> String {
    match granularity {
        Granularity::Second => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        Granularity::Minute => ts.format("%Y-%m-%d %H:%M").to_string(),
        Granularity::Hour => ts.format("%Y-%m-%d %H:00").to_string(),
        Granularity::Day | Granularity::Week => ts.format("%Y-%m-%d").to_string(),
        Granularity::Month => ts.format("%Y-%m").to_string(),
        Granularity::Quarter => format!("{}-Q{}", ts.year(), quarter_of(ts)),
        Granularity::Year => ts.format("%Y").to_string(),
    }
}

/// Text label for a cell. Timestamps are bucketed when a granularity is
/// given; anything unparseable passes through untouched.
pub fn label_for(value: &Value, granularity: Option<Granularity>) -> String {
    match (value, granularity) {
        (Value::Null, _) => NULL_LABEL.to_string(),
        (Value::Text(s), Some(g)) => match parse_timestamp(s) {
            Ok(ts) => format_bucket(&ts, g),
            Err(_) => s.clone(),
        },
        (other, _) => other.to_string(),
    }
}
