//! Explicit numeric parsing of cell values.

use cube_query::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("value is missing")]
    Missing,

    #[error("'{0}' is not a number")]
    NotNumeric(String),

    #[error("'{0}' is not a finite number")]
    NonFinite(String),
}

/// Read a cell as `f64`.
///
/// Numbers pass through and strings are trimmed then parsed. Null, booleans,
/// blank strings and anything that parses to NaN or infinity are errors.
pub fn parse_numeric(value: &Value) -> Result<f64, ParseError> {
    match value {
        Value::Number(n) if n.is_finite() => Ok(*n),
        Value::Number(n) => Err(ParseError::NonFinite(n.to_string())),
        Value::Text(s) => {
            let trimmed = s.trim();
            match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(n),
                Ok(_) => Err(ParseError::NonFinite(trimmed.to_string())),
                Err(_) => Err(ParseError::NotNumeric(trimmed.to_string())),
            }
        }
        Value::Bool(b) => Err(ParseError::NotNumeric(b.to_string())),
        Value::Null => Err(ParseError::Missing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_and_numeric_strings() {
        assert_eq!(parse_numeric(&Value::Number(12.5)), Ok(12.5));
        assert_eq!(parse_numeric(&Value::from("100.50")), Ok(100.5));
        assert_eq!(parse_numeric(&Value::from("  -3 ")), Ok(-3.0));
        assert_eq!(parse_numeric(&Value::from("1e3")), Ok(1000.0));
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert_eq!(parse_numeric(&Value::Null), Err(ParseError::Missing));
        assert_eq!(
            parse_numeric(&Value::from("n/a")),
            Err(ParseError::NotNumeric("n/a".to_string()))
        );
        assert_eq!(
            parse_numeric(&Value::from("1,234")),
            Err(ParseError::NotNumeric("1,234".to_string()))
        );
        assert_eq!(parse_numeric(&Value::from("")), Err(ParseError::NotNumeric(String::new())));
        assert!(matches!(parse_numeric(&Value::Bool(true)), Err(ParseError::NotNumeric(_))));
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(matches!(parse_numeric(&Value::from("NaN")), Err(ParseError::NonFinite(_))));
        assert!(matches!(parse_numeric(&Value::from("inf")), Err(ParseError::NonFinite(_))));
        assert!(matches!(
            parse_numeric(&Value::Number(f64::INFINITY)),
            Err(ParseError::NonFinite(_))
        ));
    }
}
