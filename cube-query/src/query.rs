use crate::filter::Filter;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Time bucket applied to a time dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Second => "second",
            Granularity::Minute => "minute",
            Granularity::Hour => "hour",
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Quarter => "quarter",
            Granularity::Year => "year",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "second" => Ok(Granularity::Second),
            "minute" => Ok(Granularity::Minute),
            "hour" => Ok(Granularity::Hour),
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            "quarter" => Ok(Granularity::Quarter),
            "year" => Ok(Granularity::Year),
            other => Err(format!("unknown granularity '{}'", other)),
        }
    }
}

/// The date window of a time dimension.
///
/// Relative ranges ("last 7 days", "this year") are resolved by the
/// service; explicit ranges are inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateRange {
    Relative(String),
    Between(NaiveDate, NaiveDate),
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRange::Relative(s) => f.write_str(s),
            DateRange::Between(start, end) => write!(f, "{} to {}", start, end),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeDimension {
    pub dimension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granularity: Option<Granularity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

impl TimeDimension {
    pub fn new(dimension: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            granularity: None,
            date_range: None,
        }
    }

    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = Some(granularity);
        self
    }

    pub fn date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Key under which the service returns bucketed values, e.g.
    /// `sales.order_date.month`.
    pub fn result_key(&self) -> String {
        match self.granularity {
            Some(g) => format!("{}.{}", self.dimension, g),
            None => self.dimension.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// A request descriptor for the `/load` endpoint.
///
/// Fields are private; a `Query` is assembled once through [`QueryBuilder`]
/// and never changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    measures: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    dimensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    time_dimensions: Vec<TimeDimension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    order: Vec<(String, OrderDirection)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset: Option<u64>,
}

impl Query {
    pub fn builder() -> QueryBuilder {
        QueryBuilder::default()
    }

    pub fn measures(&self) -> &[String] {
        &self.measures
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn time_dimensions(&self) -> &[TimeDimension] {
        &self.time_dimensions
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn order(&self) -> &[(String, OrderDirection)] {
        &self.order
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// Serialize to the JSON the service expects.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Builder for [`Query`]. Consumed by [`QueryBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    inner: Query,
}

impl QueryBuilder {
    pub fn measure(mut self, measure: impl Into<String>) -> Self {
        self.inner.measures.push(measure.into());
        self
    }

    pub fn measures<I, S>(mut self, measures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.measures.extend(measures.into_iter().map(Into::into));
        self
    }

    pub fn dimension(mut self, dimension: impl Into<String>) -> Self {
        self.inner.dimensions.push(dimension.into());
        self
    }

    pub fn time_dimension(mut self, time_dimension: TimeDimension) -> Self {
        self.inner.time_dimensions.push(time_dimension);
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.inner.filters.push(filter);
        self
    }

    pub fn filters<I>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = Filter>,
    {
        self.inner.filters.extend(filters);
        self
    }

    pub fn order_by(mut self, member: impl Into<String>, direction: OrderDirection) -> Self {
        self.inner.order.push((member.into(), direction));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.inner.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.inner.offset = Some(offset);
        self
    }

    pub fn build(self) -> Query {
        self.inner
    }
}
