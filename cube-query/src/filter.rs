use serde::{Deserialize, Serialize};
use std::fmt;

/// Filter operators understood by the analytics API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Equals,
    NotEquals,
    In,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Gt,
    Gte,
    Lt,
    Lte,
    Set,
    NotSet,
    InDateRange,
    NotInDateRange,
    BeforeDate,
    AfterDate,
}

impl Operator {
    /// `set` and `notSet` take no values.
    pub fn takes_values(&self) -> bool {
        !matches!(self, Operator::Set | Operator::NotSet)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "notEquals",
            Operator::In => "in",
            Operator::Contains => "contains",
            Operator::NotContains => "notContains",
            Operator::StartsWith => "startsWith",
            Operator::EndsWith => "endsWith",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Set => "set",
            Operator::NotSet => "notSet",
            Operator::InDateRange => "inDateRange",
            Operator::NotInDateRange => "notInDateRange",
            Operator::BeforeDate => "beforeDate",
            Operator::AfterDate => "afterDate",
        };
        f.write_str(s)
    }
}

/// A single `{member, operator, values}` condition. Filters in a query are
/// ANDed together by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Filter {
    pub member: String,
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl Filter {
    pub fn new<I, S>(member: impl Into<String>, operator: Operator, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            member: member.into(),
            operator,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn equals<I, S>(member: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(member, Operator::Equals, values)
    }

    pub fn is_set(member: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            operator: Operator::Set,
            values: Vec::new(),
        }
    }
}
