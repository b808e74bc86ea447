use crate::report::ReportIntent;
use crate::selection::FilterSelection;
use cube_data::{ChartSeries, NormalizeError, Recipe};
use cube_query::{Query, QueryError};
use thiserror::Error;

/// Why a widget could not render data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WidgetError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl WidgetError {
    pub fn is_auth(&self) -> bool {
        matches!(self, WidgetError::Query(e) if e.is_auth())
    }
}

/// One widget on the dashboard: which report it shows and, optionally, a
/// recipe that overrides the intent's default shaping.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSpec {
    pub id: String,
    pub intent: ReportIntent,
    recipe: Option<Recipe>,
}

impl WidgetSpec {
    pub fn new(intent: ReportIntent) -> Self {
        Self {
            id: intent.id().to_string(),
            intent,
            recipe: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipe = Some(recipe);
        self
    }

    pub fn query(&self, selection: &FilterSelection) -> Query {
        self.intent.query(selection)
    }

    pub fn recipe(&self, selection: &FilterSelection) -> Recipe {
        self.recipe
            .clone()
            .unwrap_or_else(|| self.intent.recipe(selection))
    }

    /// One widget per report intent, in display order.
    pub fn defaults() -> Vec<WidgetSpec> {
        ReportIntent::ALL.into_iter().map(WidgetSpec::new).collect()
    }
}

/// What a widget currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetState {
    Loading,
    Failed(WidgetError),
    /// Query succeeded with zero rows. The series carry their names so the
    /// widget can still show a legend.
    Empty(ChartSeries),
    Ready(ChartSeries),
}

impl WidgetState {
    pub fn from_series(series: ChartSeries) -> Self {
        if series.is_empty() {
            WidgetState::Empty(series)
        } else {
            WidgetState::Ready(series)
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, WidgetState::Loading)
    }

    pub fn series(&self) -> Option<&ChartSeries> {
        match self {
            WidgetState::Ready(s) | WidgetState::Empty(s) => Some(s),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&WidgetError> {
        match self {
            WidgetState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cube_data::WidgetKind;

    #[test]
    fn test_defaults_cover_every_intent_once() {
        let specs = WidgetSpec::defaults();
        assert_eq!(specs.len(), ReportIntent::ALL.len());
        assert_eq!(specs[0].id, "kpi-summary");
    }

    #[test]
    fn test_recipe_override() {
        let custom = Recipe::new(WidgetKind::Categorical)
            .label("sales.region")
            .series("sales.count");
        let spec = WidgetSpec::new(ReportIntent::RevenueByRegion).with_recipe(custom.clone());
        assert_eq!(spec.recipe(&FilterSelection::new()), custom);

        let plain = WidgetSpec::new(ReportIntent::RevenueByRegion);
        assert!(plain.recipe(&FilterSelection::new()).aggregate_by_label);
    }

    #[test]
    fn test_auth_errors_are_flagged() {
        let err = WidgetError::from(QueryError::Unauthenticated("expired".into()));
        assert!(err.is_auth());
        assert!(!WidgetError::from(NormalizeError::NoSeries).is_auth());
        assert_eq!(err.to_string(), QueryError::Unauthenticated("expired".into()).to_string());
    }
}
