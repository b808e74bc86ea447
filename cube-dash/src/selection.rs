//! Global filter selection.
//!
//! A `FilterSelection` is replaced as a whole on every change, so readers
//! never see one control updated and another not.

use cube_query::{DateRange, Filter, Granularity};
use std::collections::{BTreeMap, BTreeSet};

/// Bucket size used when no granularity has been picked.
pub const DEFAULT_GRANULARITY: Granularity = Granularity::Month;

/// Values currently chosen in every global filter control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    members: BTreeMap<String, BTreeSet<String>>,
    date_range: Option<DateRange>,
    granularity: Option<Granularity>,
}

/// Deduplicated, order-normalized form of a selection, used for change
/// detection and for building queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalFilters {
    pub filters: Vec<Filter>,
    pub date_range: Option<DateRange>,
    pub granularity: Granularity,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the values chosen for `member`. Blank values are dropped and
    /// an empty set clears the control.
    pub fn with_values<I, S>(mut self, member: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let member = member.into();
        let set: BTreeSet<String> = values
            .into_iter()
            .map(|v| v.as_ref().trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        if set.is_empty() {
            self.members.remove(&member);
        } else {
            self.members.insert(member, set);
        }
        self
    }

    pub fn without(mut self, member: &str) -> Self {
        self.members.remove(member);
        self
    }

    pub fn with_date_range(mut self, range: Option<DateRange>) -> Self {
        self.date_range = range;
        self
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = Some(granularity);
        self
    }

    pub fn values(&self, member: &str) -> Option<&BTreeSet<String>> {
        self.members.get(member)
    }

    pub fn date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref()
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity.unwrap_or(DEFAULT_GRANULARITY)
    }

    /// One `equals` filter per control with a value, sorted by member.
    pub fn filters(&self) -> Vec<Filter> {
        self.members
            .iter()
            .map(|(member, values)| Filter::equals(member.clone(), values.iter().cloned()))
            .collect()
    }

    pub fn canonical(&self) -> CanonicalFilters {
        CanonicalFilters {
            filters: self.filters(),
            date_range: self.date_range.clone(),
            granularity: self.granularity(),
        }
    }
}
