//! Report intents of the sales dashboard and the queries they build.
//!
//! Each intent has a fixed measure/dimension shape. Only the filters and the
//! time window come from the current [`FilterSelection`].

use crate::selection::FilterSelection;
use cube_data::{Recipe, WidgetKind};
use cube_query::{OrderDirection, Query, TimeDimension};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Member identifiers exposed by the workshop's data model.
pub mod members {
    pub const TOTAL_SALES_AMOUNT: &str = "sales.total_sales_amount";
    pub const COUNT: &str = "sales.count";
    pub const AVERAGE_ORDER_VALUE: &str = "sales.average_order_value";
    pub const ORDER_DATE: &str = "sales.order_date";
    pub const REGION: &str = "sales.region";
    pub const ORDER_STATUS: &str = "sales.order_status";
    pub const CUSTOMER_NAME: &str = "customers.customer_name";
}

/// Rows shown by the top-customers table.
pub const TOP_CUSTOMERS_LIMIT: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportIntent {
    SalesOverTime,
    RevenueByRegion,
    OrdersByStatus,
    TopCustomers,
    KpiSummary,
}

impl ReportIntent {
    pub const ALL: [ReportIntent; 5] = [
        ReportIntent::KpiSummary,
        ReportIntent::SalesOverTime,
        ReportIntent::RevenueByRegion,
        ReportIntent::OrdersByStatus,
        ReportIntent::TopCustomers,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ReportIntent::SalesOverTime => "sales-over-time",
            ReportIntent::RevenueByRegion => "revenue-by-region",
            ReportIntent::OrdersByStatus => "orders-by-status",
            ReportIntent::TopCustomers => "top-customers",
            ReportIntent::KpiSummary => "kpi-summary",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportIntent::SalesOverTime => "Sales Over Time",
            ReportIntent::RevenueByRegion => "Revenue by Region",
            ReportIntent::OrdersByStatus => "Orders by Status",
            ReportIntent::TopCustomers => "Top Customers",
            ReportIntent::KpiSummary => "Key Metrics",
        }
    }

    pub fn kind(&self) -> WidgetKind {
        match self {
            ReportIntent::SalesOverTime => WidgetKind::TimeSeries,
            ReportIntent::RevenueByRegion | ReportIntent::TopCustomers => WidgetKind::Categorical,
            ReportIntent::OrdersByStatus => WidgetKind::Proportional,
            ReportIntent::KpiSummary => WidgetKind::Kpi,
        }
    }

    /// Build the query for this intent under `selection`.
    pub fn query(&self, selection: &FilterSelection) -> Query {
        let builder = Query::builder().filters(selection.filters());
        let window = selection
            .date_range()
            .map(|range| TimeDimension::new(members::ORDER_DATE).date_range(range.clone()));

        let builder = match self {
            ReportIntent::SalesOverTime => {
                let mut td = TimeDimension::new(members::ORDER_DATE).granularity(selection.granularity());
                if let Some(range) = selection.date_range() {
                    td = td.date_range(range.clone());
                }
                builder
                    .measure(members::TOTAL_SALES_AMOUNT)
                    .time_dimension(td)
                    .order_by(members::ORDER_DATE, OrderDirection::Asc)
            }
            ReportIntent::RevenueByRegion => builder
                .measure(members::TOTAL_SALES_AMOUNT)
                .dimension(members::REGION)
                .order_by(members::TOTAL_SALES_AMOUNT, OrderDirection::Desc),
            ReportIntent::OrdersByStatus => builder
                .measure(members::COUNT)
                .dimension(members::ORDER_STATUS),
            ReportIntent::TopCustomers => builder
                .measure(members::TOTAL_SALES_AMOUNT)
                .dimension(members::CUSTOMER_NAME)
                .order_by(members::TOTAL_SALES_AMOUNT, OrderDirection::Desc)
                .limit(TOP_CUSTOMERS_LIMIT),
            ReportIntent::KpiSummary => builder.measures([
                members::TOTAL_SALES_AMOUNT,
                members::COUNT,
                members::AVERAGE_ORDER_VALUE,
            ]),
        };

        match (self, window) {
            (ReportIntent::SalesOverTime, _) | (_, None) => builder.build(),
            (_, Some(td)) => builder.time_dimension(td).build(),
        }
    }

    /// How this intent's rows become a chart.
    pub fn recipe(&self, selection: &FilterSelection) -> Recipe {
        match self {
            ReportIntent::SalesOverTime => {
                let bucket = TimeDimension::new(members::ORDER_DATE)
                    .granularity(selection.granularity())
                    .result_key();
                Recipe::new(self.kind())
                    .label(bucket)
                    .series(members::TOTAL_SALES_AMOUNT)
                    .granularity(selection.granularity())
            }
            ReportIntent::RevenueByRegion => Recipe::new(self.kind())
                .label(members::REGION)
                .series(members::TOTAL_SALES_AMOUNT)
                .aggregate_by_label(),
            ReportIntent::OrdersByStatus => Recipe::new(self.kind())
                .label(members::ORDER_STATUS)
                .series(members::COUNT)
                .aggregate_by_label(),
            ReportIntent::TopCustomers => Recipe::new(self.kind())
                .label(members::CUSTOMER_NAME)
                .series(members::TOTAL_SALES_AMOUNT),
            ReportIntent::KpiSummary => Recipe::new(self.kind())
                .named_series(members::TOTAL_SALES_AMOUNT, "Total Sales")
                .named_series(members::COUNT, "Orders")
                .named_series(members::AVERAGE_ORDER_VALUE, "Avg Order Value")
                .aggregate_by_label(),
        }
    }
}

impl fmt::Display for ReportIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ReportIntent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportIntent::ALL
            .into_iter()
            .find(|intent| intent.id() == s.trim())
            .ok_or_else(|| {
                let known: Vec<&str> = ReportIntent::ALL.iter().map(|i| i.id()).collect();
                format!("unknown report '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cube_query::{DateRange, Granularity, Operator};

    fn europe_2024() -> FilterSelection {
        FilterSelection::new()
            .with_values(members::REGION, ["EUROPE"])
            .with_date_range(Some(DateRange::Between(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            )))
            .with_granularity(Granularity::Week)
    }

    #[test]
    fn test_sales_over_time_uses_selected_window() {
        let query = ReportIntent::SalesOverTime.query(&europe_2024());
        assert_eq!(query.measures(), [members::TOTAL_SALES_AMOUNT]);
        assert_eq!(query.time_dimensions().len(), 1);
        let td = &query.time_dimensions()[0];
        assert_eq!(td.granularity, Some(Granularity::Week));
        assert!(matches!(td.date_range, Some(DateRange::Between(_, _))));
        assert_eq!(query.filters().len(), 1);
        assert_eq!(query.filters()[0].operator, Operator::Equals);
    }

    #[test]
    fn test_fixed_shape_does_not_depend_on_selection() {
        for intent in ReportIntent::ALL {
            let plain = intent.query(&FilterSelection::new());
            let filtered = intent.query(&europe_2024());
            assert_eq!(plain.measures(), filtered.measures());
            assert_eq!(plain.dimensions(), filtered.dimensions());
            assert!(plain.filters().is_empty());
            assert_eq!(filtered.filters().len(), 1);
        }
    }

    #[test]
    fn test_window_without_granularity_for_non_time_reports() {
        let query = ReportIntent::RevenueByRegion.query(&europe_2024());
        assert_eq!(query.dimensions(), [members::REGION]);
        assert_eq!(query.time_dimensions().len(), 1);
        assert_eq!(query.time_dimensions()[0].granularity, None);

        let unbounded = ReportIntent::RevenueByRegion.query(&FilterSelection::new());
        assert!(unbounded.time_dimensions().is_empty());
    }

    #[test]
    fn test_top_customers_is_limited() {
        let query = ReportIntent::TopCustomers.query(&FilterSelection::new());
        assert_eq!(query.limit(), Some(TOP_CUSTOMERS_LIMIT));
        assert_eq!(
            query.order(),
            [(members::TOTAL_SALES_AMOUNT.to_string(), OrderDirection::Desc)]
        );
    }

    #[test]
    fn test_time_series_recipe_follows_granularity() {
        let recipe = ReportIntent::SalesOverTime.recipe(&europe_2024());
        assert_eq!(recipe.label_field.as_deref(), Some("sales.order_date.week"));
        assert_eq!(recipe.granularity, Some(Granularity::Week));
    }

    #[test]
    fn test_intent_ids_parse_back() {
        for intent in ReportIntent::ALL {
            assert_eq!(intent.id().parse::<ReportIntent>(), Ok(intent));
        }
        assert!("pie-in-the-sky".parse::<ReportIntent>().is_err());
    }
}
