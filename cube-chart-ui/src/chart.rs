//! Which renderer draws a widget and with what configuration.

use crate::format::ValueFormat;
use cube_dash::report::members;
use cube_dash::{FilterSelection, ReportIntent, WidgetSpec};
use cube_data::{ChartSeries, WidgetKind};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderer {
    TimeSeries,
    Bar,
    Pie,
    Table,
}

impl Renderer {
    pub const ALL: [Renderer; 4] = [Renderer::TimeSeries, Renderer::Bar, Renderer::Pie, Renderer::Table];

    pub fn js_function(&self) -> &'static str {
        match self {
            Renderer::TimeSeries => "renderTimeSeriesChart",
            Renderer::Bar => "renderBarChart",
            Renderer::Pie => "renderPieChart",
            Renderer::Table => "renderDataTable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub title: String,
    pub value_format: ValueFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_header: Option<String>,
}

/// Display format for values of a measure.
pub fn value_format(member: &str) -> ValueFormat {
    match member {
        members::COUNT => ValueFormat::Count,
        members::TOTAL_SALES_AMOUNT | members::AVERAGE_ORDER_VALUE => ValueFormat::Currency,
        _ => ValueFormat::Number,
    }
}

/// Renderer and config for a widget, or `None` for KPI widgets, which are
/// drawn as cards instead of a chart.
pub fn chart_for(spec: &WidgetSpec, series: &ChartSeries) -> Option<(Renderer, ChartConfig)> {
    let renderer = match series.kind() {
        WidgetKind::Kpi => return None,
        WidgetKind::TimeSeries => Renderer::TimeSeries,
        WidgetKind::Proportional => Renderer::Pie,
        WidgetKind::Categorical if spec.intent == ReportIntent::TopCustomers => Renderer::Table,
        WidgetKind::Categorical => Renderer::Bar,
    };
    let format = series
        .series()
        .first()
        .map(|s| value_format(&s.field))
        .unwrap_or(ValueFormat::Number);
    let label_header = (renderer == Renderer::Table).then(|| "Customer".to_string());

    Some((
        renderer,
        ChartConfig {
            title: spec.intent.title().to_string(),
            value_format: format,
            label_header,
        },
    ))
}

/// One-line summary of the active filters, shown under widget titles.
pub fn describe_selection(selection: &FilterSelection) -> String {
    let mut parts: Vec<String> = selection
        .filters()
        .iter()
        .map(|f| format!("{}: {}", f.member, f.values.join(", ")))
        .collect();
    if let Some(range) = selection.date_range() {
        parts.push(range.to_string());
    }
    parts.push(format!("by {}", selection.granularity()));
    parts.join(" | ")
}

/// DOM id of a widget's chart container.
pub fn container_id(spec: &WidgetSpec) -> String {
    format!("{}-chart", spec.id)
}
