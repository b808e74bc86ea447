//! Per-widget extraction recipes.

use cube_query::{Annotation, Granularity};
use serde::{Deserialize, Serialize};

/// The family of visual a recipe feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    /// Line/area chart over a time dimension
    TimeSeries,
    /// Bar/column chart over a categorical dimension
    Categorical,
    /// Pie/donut segment breakdown
    Proportional,
    /// Single-number KPI card
    Kpi,
}

/// What to do with a value that does not parse as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unparseable {
    /// Substitute 0.0 and record a warning
    #[default]
    Zero,
    /// Fail the whole normalization
    Propagate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSpec {
    pub field: String,
    /// Overrides the annotation title
    pub name: Option<String>,
}

impl SeriesSpec {
    /// Explicit name, then the annotation's short title or title, then the field id.
    pub fn display_name(&self, annotation: &Annotation) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        annotation
            .get(&self.field)
            .and_then(|meta| meta.short_title.as_deref().or(meta.title.as_deref()))
            .unwrap_or(&self.field)
            .to_string()
    }
}

/// Which field labels each point and which fields become numeric series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub kind: WidgetKind,
    /// `None` puts every row under a single "Total" label
    pub label_field: Option<String>,
    pub series: Vec<SeriesSpec>,
    /// Sum rows that share a label instead of emitting one point per row
    pub aggregate_by_label: bool,
    pub on_unparseable: Unparseable,
    /// Label bucket format for time series; inferred from the query when unset
    pub granularity: Option<Granularity>,
}

impl Recipe {
    pub fn new(kind: WidgetKind) -> Self {
        Self {
            kind,
            label_field: None,
            series: Vec::new(),
            aggregate_by_label: false,
            on_unparseable: Unparseable::default(),
            granularity: None,
        }
    }

    pub fn label(mut self, field: impl Into<String>) -> Self {
        self.label_field = Some(field.into());
        self
    }

    pub fn series(mut self, field: impl Into<String>) -> Self {
        self.series.push(SeriesSpec {
            field: field.into(),
            name: None,
        });
        self
    }

    pub fn named_series(mut self, field: impl Into<String>, name: impl Into<String>) -> Self {
        self.series.push(SeriesSpec {
            field: field.into(),
            name: Some(name.into()),
        });
        self
    }

    pub fn aggregate_by_label(mut self) -> Self {
        self.aggregate_by_label = true;
        self
    }

    pub fn propagate_unparseable(mut self) -> Self {
        self.on_unparseable = Unparseable::Propagate;
        self
    }

    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = Some(granularity);
        self
    }
}
