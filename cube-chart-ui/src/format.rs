//! Number formatting for cards, tooltips and tables.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    Currency,
    Count,
    Percent,
    Number,
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn with_decimals(value: f64, decimals: usize) -> (bool, String) {
    let fixed = format!("{:.*}", decimals, value.abs());
    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let grouped = match fixed.split_once('.') {
        Some((int, frac)) => format!("{}.{}", group_thousands(int), frac),
        None => group_thousands(&fixed),
    };
    (negative, grouped)
}

pub fn format_value(value: f64, format: ValueFormat) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let (negative, body) = match format {
        ValueFormat::Currency => {
            let (negative, digits) = with_decimals(value, 2);
            (negative, format!("${}", digits))
        }
        ValueFormat::Count => with_decimals(value.round(), 0),
        ValueFormat::Percent => {
            let (negative, digits) = with_decimals(value, 1);
            (negative, format!("{}%", digits))
        }
        ValueFormat::Number => {
            let (negative, digits) = with_decimals(value, 2);
            let trimmed = if digits.contains('.') {
                digits.trim_end_matches('0').trim_end_matches('.').to_string()
            } else {
                digits
            };
            (negative, trimmed)
        }
    };
    if negative {
        format!("-{}", body)
    } else {
        body
    }
}
