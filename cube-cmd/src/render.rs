//! Plain-text rendering for terminal output.

use cube_dash::{WidgetSpec, WidgetState};
use cube_data::ChartSeries;
use cube_query::{Row, Value};
use std::collections::BTreeSet;

/// Left-aligned first column, right-aligned value columns.
pub fn table(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                if i == 0 {
                    format!("{:<width$}", cell, width = width)
                } else {
                    format!("{:>width$}", cell, width = width)
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(header)];
    out.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
    out.extend(rows.iter().map(|r| line(r)));
    out.join("\n")
}

fn number(v: f64) -> String {
    Value::Number(v).to_string()
}

/// Labels down the side, one column per series.
pub fn series_table(series: &ChartSeries) -> String {
    let mut header = vec!["label".to_string()];
    header.extend(series.series().iter().map(|s| s.name.clone()));
    let rows: Vec<Vec<String>> = (0..series.len())
        .filter_map(|i| series.point(i))
        .map(|(label, values)| {
            let mut row = vec![label.to_string()];
            row.extend(values.into_iter().map(number));
            row
        })
        .collect();
    table(&header, &rows)
}

/// Every member that appears in any row becomes a column.
pub fn rows_table(rows: &[Row]) -> String {
    let columns: BTreeSet<&String> = rows.iter().flat_map(|r| r.keys()).collect();
    let header: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| row.get(*c).map(|v| v.to_string()).unwrap_or_default())
                .collect()
        })
        .collect();
    table(&header, &body)
}

/// One block per widget for the `dashboard` command.
pub fn widget_block(spec: &WidgetSpec, state: &WidgetState) -> String {
    let title = format!("== {} ({}) ==", spec.intent.title(), spec.id);
    let body = match state {
        WidgetState::Loading => "still loading".to_string(),
        WidgetState::Failed(err) => format!("error: {}", err),
        WidgetState::Empty(series) => {
            let names: Vec<&str> = series.series().iter().map(|s| s.name.as_str()).collect();
            format!("no data ({})", names.join(", "))
        }
        WidgetState::Ready(series) => series_table(series),
    };
    format!("{}\n{}", title, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cube_dash::ReportIntent;
    use cube_data::{normalize, Recipe, WidgetKind};
    use cube_query::{Annotation, Query, QueryResponse, QueryError};

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect()
    }

    fn region_series() -> ChartSeries {
        let rows = vec![
            row(&[("sales.region", "AMERICA"), ("sales.total_sales_amount", "150.50")]),
            row(&[("sales.region", "EUROPE"), ("sales.total_sales_amount", "200.25")]),
        ];
        let response = QueryResponse::new(Query::default(), rows, Annotation::default());
        let recipe = Recipe::new(WidgetKind::Categorical)
            .label("sales.region")
            .named_series("sales.total_sales_amount", "Total");
        normalize(&response, &recipe).unwrap()
    }

    #[test]
    fn test_series_table() {
        assert_eq!(
            series_table(&region_series()),
            "label     Total\n-------  ------\nAMERICA   150.5\nEUROPE   200.25"
        );
    }

    #[test]
    fn test_rows_table_fills_missing_cells() {
        let rows = vec![row(&[("a", "1")]), row(&[("a", "2"), ("b", "x")])];
        assert_eq!(rows_table(&rows), "a  b\n-  -\n1\n2  x");
    }

    #[test]
    fn test_widget_block_states() {
        let spec = WidgetSpec::new(ReportIntent::OrdersByStatus);
        let failed = WidgetState::Failed(QueryError::Forbidden("no access".into()).into());
        assert!(widget_block(&spec, &failed).ends_with("error: access denied: no access"));
        let ready = widget_block(&spec, &WidgetState::Ready(region_series()));
        assert!(ready.starts_with("== Orders by Status (orders-by-status) =="));
        assert!(ready.contains("EUROPE"));
    }
}
