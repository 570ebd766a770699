use chrono::{DateTime, Utc};

use super::error::FilterError;
use super::params::SearchParams;
use super::types::{Constraint, FilterValue};
use crate::models::{timestamp, LeadSource, LeadStatus};

/// Structured search predicate over leads.
///
/// Every populated field is AND-ed together. `text` is a single AND-term that
/// matches when any of first name, last name, email, company or city contains
/// it (case-insensitive). An empty `Vec` means the field is unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadFilter {
    pub text: Option<String>,
    pub email: Vec<Constraint<String>>,
    pub company: Vec<Constraint<String>>,
    pub city: Vec<Constraint<String>>,
    pub status: Vec<Constraint<LeadStatus>>,
    pub source: Vec<Constraint<LeadSource>>,
    pub score: Vec<Constraint<f64>>,
    pub lead_value: Vec<Constraint<f64>>,
    pub created_at: Vec<Constraint<DateTime<Utc>>>,
    pub last_activity_at: Vec<Constraint<DateTime<Utc>>>,
    pub is_qualified: Option<bool>,
}

/// The four query parameters that drive one ordered (numeric or date) field
struct OrderedParams<'a> {
    exact: (&'static str, &'a Option<String>),
    gt: (&'static str, &'a Option<String>),
    lt: (&'static str, &'a Option<String>),
    between: (&'static str, &'a Option<String>),
}

impl LeadFilter {
    /// Parse search query parameters into a predicate.
    ///
    /// Per-field precedence:
    /// - text fields: `*_contains` wins over the exact value
    /// - enumerations: `*_in` wins over the single value
    /// - numbers and dates: `*_between` wins over `gt`/`lt` (which combine),
    ///   which win over the exact value
    ///
    /// Every supplied parameter is parsed, including ones that lose on
    /// precedence, so malformed input always fails the request.
    pub fn from_params(params: &SearchParams) -> Result<Self, FilterError> {
        Ok(Self {
            text: given(&params.q).map(str::to_string),
            email: text_field(&params.email, &params.email_contains),
            company: text_field(&params.company, &params.company_contains),
            city: text_field(&params.city, &params.city_contains),
            status: enum_field(("status", &params.status), ("status_in", &params.status_in))?,
            source: enum_field(("source", &params.source), ("source_in", &params.source_in))?,
            score: ordered_field(
                OrderedParams {
                    exact: ("score", &params.score),
                    gt: ("score_gt", &params.score_gt),
                    lt: ("score_lt", &params.score_lt),
                    between: ("score_between", &params.score_between),
                },
                parse_number,
            )?,
            lead_value: ordered_field(
                OrderedParams {
                    exact: ("lead_value", &params.lead_value),
                    gt: ("lead_value_gt", &params.lead_value_gt),
                    lt: ("lead_value_lt", &params.lead_value_lt),
                    between: ("lead_value_between", &params.lead_value_between),
                },
                parse_number,
            )?,
            created_at: ordered_field(
                OrderedParams {
                    exact: ("created_on", &params.created_on),
                    gt: ("created_after", &params.created_after),
                    lt: ("created_before", &params.created_before),
                    between: ("created_between", &params.created_between),
                },
                parse_timestamp,
            )?,
            last_activity_at: ordered_field(
                OrderedParams {
                    exact: ("last_on", &params.last_on),
                    gt: ("last_after", &params.last_after),
                    lt: ("last_before", &params.last_before),
                    between: ("last_between", &params.last_between),
                },
                parse_timestamp,
            )?,
            is_qualified: given(&params.is_qualified).map(|v| v == "true"),
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Present and non-empty
fn given(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().filter(|s| !s.is_empty())
}

fn text_field(exact: &Option<String>, contains: &Option<String>) -> Vec<Constraint<String>> {
    match (given(exact), given(contains)) {
        (_, Some(needle)) => vec![Constraint::Contains(needle.to_string())],
        (Some(value), None) => vec![Constraint::Equals(value.to_string())],
        (None, None) => vec![],
    }
}

fn enum_field<T>(
    single: (&'static str, &Option<String>),
    set: (&'static str, &Option<String>),
) -> Result<Vec<Constraint<T>>, FilterError>
where
    T: FilterValue + std::str::FromStr,
{
    let parse = |param: &'static str, raw: &str| {
        raw.parse::<T>().map_err(|_| FilterError::InvalidEnum { param, value: raw.to_string() })
    };

    let single = given(single.1).map(|raw| parse(single.0, raw.trim())).transpose()?;
    let set = given(set.1)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| parse(set.0, item))
                .collect::<Result<Vec<T>, _>>()
        })
        .transpose()?;

    Ok(match (single, set) {
        (_, Some(values)) => vec![Constraint::InSet(values)],
        (Some(value), None) => vec![Constraint::Equals(value)],
        (None, None) => vec![],
    })
}

fn ordered_field<T: FilterValue>(
    params: OrderedParams<'_>,
    parse: fn(&'static str, &str) -> Result<T, FilterError>,
) -> Result<Vec<Constraint<T>>, FilterError> {
    let single = |(param, raw): (&'static str, &Option<String>)| given(raw).map(|v| parse(param, v)).transpose();

    let exact = single(params.exact)?;
    let gt = single(params.gt)?;
    let lt = single(params.lt)?;
    let between = {
        let (param, raw) = params.between;
        given(raw)
            .map(|v| {
                let (min, max) = split_pair(param, v)?;
                Ok::<_, FilterError>((parse(param, min)?, parse(param, max)?))
            })
            .transpose()?
    };

    if let Some((min, max)) = between {
        return Ok(vec![Constraint::Range { min, max }]);
    }

    let bounds: Vec<Constraint<T>> = gt
        .map(Constraint::GreaterThan)
        .into_iter()
        .chain(lt.map(Constraint::LessThan))
        .collect();
    if !bounds.is_empty() {
        return Ok(bounds);
    }

    Ok(exact.map(Constraint::Equals).into_iter().collect())
}

fn split_pair<'a>(param: &'static str, raw: &'a str) -> Result<(&'a str, &'a str), FilterError> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [min, max] if !min.is_empty() && !max.is_empty() => Ok((*min, *max)),
        _ => Err(FilterError::InvalidRange { param, value: raw.to_string() }),
    }
}

pub(crate) fn parse_number(param: &'static str, raw: &str) -> Result<f64, FilterError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| FilterError::InvalidNumber { param, value: raw.to_string() })
}

/// See [`crate::models::timestamp::parse_timestamp`] for the accepted shapes
pub(crate) fn parse_timestamp(param: &'static str, raw: &str) -> Result<DateTime<Utc>, FilterError> {
    timestamp::parse_timestamp(raw).ok_or_else(|| FilterError::InvalidDate { param, value: raw.to_string() })
}
