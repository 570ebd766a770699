use chrono::{DateTime, Utc};

use crate::models::{LeadSource, LeadStatus};

/// A single constraint on one field
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint<T> {
    Equals(T),
    /// Case-insensitive substring; only built for text fields
    Contains(String),
    InSet(Vec<T>),
    /// Inclusive on both ends
    Range { min: T, max: T },
    GreaterThan(T),
    LessThan(T),
}

/// Values that can sit inside a [`Constraint`]
pub trait FilterValue: Clone + PartialOrd {
    fn to_param(&self) -> SqlParam;

    fn contains_ci(&self, _needle: &str) -> bool {
        false
    }
}

impl FilterValue for String {
    fn to_param(&self) -> SqlParam {
        SqlParam::Text(self.clone())
    }

    fn contains_ci(&self, needle: &str) -> bool {
        self.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl FilterValue for f64 {
    fn to_param(&self) -> SqlParam {
        SqlParam::Float(*self)
    }
}

impl FilterValue for DateTime<Utc> {
    fn to_param(&self) -> SqlParam {
        SqlParam::Timestamp(*self)
    }
}

impl FilterValue for LeadStatus {
    fn to_param(&self) -> SqlParam {
        SqlParam::Text(self.as_str().to_string())
    }
}

impl FilterValue for LeadSource {
    fn to_param(&self) -> SqlParam {
        SqlParam::Text(self.as_str().to_string())
    }
}

/// Typed positional parameter for a rendered WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Float(f64),
    Timestamp(DateTime<Utc>),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortDirection {
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterOrderInfo {
    pub column: &'static str,
    pub sort: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}
