use crate::recipe::WidgetKind;
use serde::Serialize;

/// One named numeric series, aligned with its chart's labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSeries {
    pub name: String,
    pub field: String,
    pub values: Vec<f64>,
}

/// Labels plus one or more positionally aligned data series.
///
/// Only [`crate::normalize`] builds these, so every series always has
/// exactly one value per label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    kind: WidgetKind,
    labels: Vec<String>,
    series: Vec<DataSeries>,
}

impl ChartSeries {
    pub(crate) fn from_parts(kind: WidgetKind, labels: Vec<String>, series: Vec<DataSeries>) -> Self {
        debug_assert!(series.iter().all(|s| s.values.len() == labels.len()));
        Self { kind, labels, series }
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn series(&self) -> &[DataSeries] {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// No data points. The series themselves are still present.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Look a series up by display name or by field id.
    pub fn series_named(&self, name: &str) -> Option<&DataSeries> {
        self.series
            .iter()
            .find(|s| s.name == name)
            .or_else(|| self.series.iter().find(|s| s.field == name))
    }

    /// First value of a series, as shown on a KPI card.
    pub fn first_value(&self, name: &str) -> Option<f64> {
        self.series_named(name).and_then(|s| s.values.first().copied())
    }

    /// Each label's percentage share of the first series' total.
    /// All zeros when the total is zero.
    pub fn shares(&self) -> Vec<f64> {
        let Some(first) = self.series.first() else {
            return Vec::new();
        };
        let total: f64 = first.values.iter().sum();
        if total == 0.0 {
            return vec![0.0; first.values.len()];
        }
        first.values.iter().map(|v| v / total * 100.0).collect()
    }

    /// The label and every series' value at `index`.
    pub fn point(&self, index: usize) -> Option<(&str, Vec<f64>)> {
        let label = self.labels.get(index)?;
        let values = self.series.iter().map(|s| s.values[index]).collect();
        Some((label.as_str(), values))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
