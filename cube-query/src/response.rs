//! Result rows and display metadata returned by the `/load` endpoint.

use crate::error::{error_message, QueryError};
use crate::query::Query;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A loosely typed cell value.
///
/// High-precision numerics arrive as strings; callers parse explicitly
/// instead of assuming a numeric type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
    Null,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => f.write_str("null"),
        }
    }
}

/// One result row, keyed by member identifier (`sales.region`, ...).
pub type Row = BTreeMap<String, Value>;

/// Display metadata for one member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberMeta {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub short_title: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Value-format hint such as `currency` or `percent`
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(default)]
    pub measures: BTreeMap<String, MemberMeta>,
    #[serde(default)]
    pub dimensions: BTreeMap<String, MemberMeta>,
    #[serde(default)]
    pub segments: BTreeMap<String, MemberMeta>,
    #[serde(default)]
    pub time_dimensions: BTreeMap<String, MemberMeta>,
}

impl Annotation {
    /// Look a member up in every section.
    pub fn get(&self, member: &str) -> Option<&MemberMeta> {
        self.measures
            .get(member)
            .or_else(|| self.dimensions.get(member))
            .or_else(|| self.time_dimensions.get(member))
            .or_else(|| self.segments.get(member))
    }

    pub fn title(&self, member: &str) -> Option<&str> {
        self.get(member).and_then(|m| m.title.as_deref())
    }
}

/// Rows plus annotation for one executed [`Query`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    pub query: Query,
    pub rows: Vec<Row>,
    pub annotation: Annotation,
    pub last_refresh_time: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadBody {
    #[serde(default)]
    data: Option<Vec<Row>>,
    #[serde(default)]
    annotation: Annotation,
    #[serde(default)]
    last_refresh_time: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl QueryResponse {
    pub fn new(query: Query, rows: Vec<Row>, annotation: Annotation) -> Self {
        Self {
            query,
            rows,
            annotation,
            last_refresh_time: None,
        }
    }

    /// Decode a successful `/load` body for `query`.
    ///
    /// An `error` key in a 2xx body (the "Continue wait" reply included)
    /// is a [`QueryError::RemoteFault`], as is any body that does not decode.
    pub fn from_body(query: Query, body: &str) -> Result<Self, QueryError> {
        let parsed: LoadBody = serde_json::from_str(body)
            .map_err(|e| QueryError::RemoteFault(format!("invalid response body: {}", e)))?;
        if parsed.error.is_some() {
            return Err(QueryError::RemoteFault(error_message(body)));
        }
        let rows = parsed
            .data
            .ok_or_else(|| QueryError::RemoteFault("response has no data".to_string()))?;
        Ok(Self {
            query,
            rows,
            annotation: parsed.annotation,
            last_refresh_time: parsed.last_refresh_time,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "query": {"measures": ["sales.total_sales_amount"], "dimensions": ["sales.region"], "timezone": "UTC"},
        "data": [
            {"sales.region": "AMERICA", "sales.total_sales_amount": "100.50"},
            {"sales.region": "EUROPE", "sales.total_sales_amount": 200.25},
            {"sales.region": null, "sales.total_sales_amount": "7"}
        ],
        "lastRefreshTime": "2025-06-01T10:00:00.000Z",
        "annotation": {
            "measures": {"sales.total_sales_amount": {"title": "Sales Total Sales Amount", "shortTitle": "Total Sales Amount", "type": "number", "format": "currency"}},
            "dimensions": {"sales.region": {"title": "Sales Region", "type": "string"}},
            "segments": {},
            "timeDimensions": {}
        },
        "slowQuery": false
    }"#;

    fn query() -> Query {
        Query::builder()
            .measure("sales.total_sales_amount")
            .dimension("sales.region")
            .build()
    }

    #[test]
    fn test_from_body_decodes_rows_and_annotation() {
        let response = QueryResponse::from_body(query(), BODY).unwrap();
        assert_eq!(response.rows.len(), 3);
        assert_eq!(response.rows[0]["sales.total_sales_amount"], Value::Text("100.50".into()));
        assert_eq!(response.rows[1]["sales.total_sales_amount"], Value::Number(200.25));
        assert!(response.rows[2]["sales.region"].is_null());
        assert_eq!(response.annotation.title("sales.region"), Some("Sales Region"));
        assert_eq!(
            response.annotation.get("sales.total_sales_amount").and_then(|m| m.format.as_deref()),
            Some("currency")
        );
        assert_eq!(response.last_refresh_time.as_deref(), Some("2025-06-01T10:00:00.000Z"));
        assert_eq!(response.query, query());
    }

    #[test]
    fn test_continue_wait_is_a_remote_fault() {
        let err = QueryResponse::from_body(query(), r#"{"error":"Continue wait"}"#).unwrap_err();
        assert_eq!(err, QueryError::RemoteFault("Continue wait".to_string()));
    }

    #[test]
    fn test_garbage_body_is_a_remote_fault() {
        let err = QueryResponse::from_body(query(), "<html>oops</html>").unwrap_err();
        assert!(matches!(err, QueryError::RemoteFault(_)));
        let err = QueryResponse::from_body(query(), r#"{"annotation":{}}"#).unwrap_err();
        assert!(matches!(err, QueryError::RemoteFault(_)));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Number(42.0).to_string(), "42");
        assert_eq!(Value::Number(1.5).to_string(), "1.5");
        assert_eq!(Value::from("AMERICA").to_string(), "AMERICA");
        assert_eq!(Value::Null.to_string(), "null");
    }
}
