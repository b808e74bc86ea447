//! Row-to-chart normalization.
//!
//! Every expected series is always present in the output, even when the
//! response has no rows, so widgets can show an explicit "no data" state.

use crate::labels::{label_for, TOTAL_LABEL};
use crate::numeric::{parse_numeric, ParseError};
use crate::recipe::{Recipe, Unparseable, WidgetKind};
use crate::series::{ChartSeries, DataSeries};
use cube_query::{Granularity, QueryResponse, Row, Value};
use log::warn;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("recipe names no numeric series")]
    NoSeries,

    #[error("row {row}, field '{field}': {source}")]
    Unparseable {
        row: usize,
        field: String,
        source: ParseError,
    },
}

/// A value that was replaced by 0.0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationWarning {
    pub row: usize,
    pub field: String,
    pub error: ParseError,
}

impl fmt::Display for NormalizationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}, field '{}': {} (using 0)",
            self.row, self.field, self.error
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub series: ChartSeries,
    pub warnings: Vec<NormalizationWarning>,
}

/// Shape `response` for a widget, discarding warnings after logging them.
pub fn normalize(response: &QueryResponse, recipe: &Recipe) -> Result<ChartSeries, NormalizeError> {
    normalize_with_warnings(response, recipe).map(|n| n.series)
}

/// Granularity used to format labels: the recipe's, else the one the query
/// requested for the label field.
fn label_granularity(response: &QueryResponse, recipe: &Recipe) -> Option<Granularity> {
    if recipe.kind != WidgetKind::TimeSeries {
        return None;
    }
    if recipe.granularity.is_some() {
        return recipe.granularity;
    }
    let label_field = recipe.label_field.as_deref()?;
    response
        .query
        .time_dimensions()
        .iter()
        .find(|td| td.result_key() == label_field || td.dimension == label_field)
        .and_then(|td| td.granularity)
}

fn row_label(row: &Row, recipe: &Recipe, granularity: Option<Granularity>) -> String {
    match &recipe.label_field {
        Some(field) => label_for(row.get(field).unwrap_or(&Value::Null), granularity),
        None => TOTAL_LABEL.to_string(),
    }
}

pub fn normalize_with_warnings(
    response: &QueryResponse,
    recipe: &Recipe,
) -> Result<Normalized, NormalizeError> {
    if recipe.series.is_empty() {
        return Err(NormalizeError::NoSeries);
    }

    let granularity = label_granularity(response, recipe);
    let mut labels: Vec<String> = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); recipe.series.len()];
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut warnings = Vec::new();

    for (row_index, row) in response.rows.iter().enumerate() {
        let mut values = Vec::with_capacity(recipe.series.len());
        for spec in &recipe.series {
            let cell = row.get(&spec.field).unwrap_or(&Value::Null);
            let value = match parse_numeric(cell) {
                Ok(v) => v,
                Err(error) => match recipe.on_unparseable {
                    Unparseable::Zero => {
                        let warning = NormalizationWarning {
                            row: row_index,
                            field: spec.field.clone(),
                            error,
                        };
                        warn!("Normalization warning: {}", warning);
                        warnings.push(warning);
                        0.0
                    }
                    Unparseable::Propagate => {
                        return Err(NormalizeError::Unparseable {
                            row: row_index,
                            field: spec.field.clone(),
                            source: error,
                        })
                    }
                },
            };
            values.push(value);
        }

        let label = row_label(row, recipe, granularity);
        if recipe.aggregate_by_label {
            if let Some(&position) = positions.get(&label) {
                for (column, value) in columns.iter_mut().zip(values) {
                    column[position] += value;
                }
                continue;
            }
            positions.insert(label.clone(), labels.len());
        }
        labels.push(label);
        for (column, value) in columns.iter_mut().zip(values) {
            column.push(value);
        }
    }

    let series = recipe
        .series
        .iter()
        .zip(columns)
        .map(|(spec, values)| DataSeries {
            name: spec.display_name(&response.annotation),
            field: spec.field.clone(),
            values,
        })
        .collect();

    Ok(Normalized {
        series: ChartSeries::from_parts(recipe.kind, labels, series),
        warnings,
    })
}
