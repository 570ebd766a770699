use serde::Deserialize;

/// Raw query string of GET /leads/search. Every value arrives as text and is
/// parsed by [`LeadFilter::from_params`](super::LeadFilter::from_params).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,

    pub email: Option<String>,
    pub email_contains: Option<String>,
    pub company: Option<String>,
    pub company_contains: Option<String>,
    pub city: Option<String>,
    pub city_contains: Option<String>,

    pub status: Option<String>,
    pub status_in: Option<String>,
    pub source: Option<String>,
    pub source_in: Option<String>,

    pub score: Option<String>,
    pub score_gt: Option<String>,
    pub score_lt: Option<String>,
    pub score_between: Option<String>,
    pub lead_value: Option<String>,
    pub lead_value_gt: Option<String>,
    pub lead_value_lt: Option<String>,
    pub lead_value_between: Option<String>,

    pub created_on: Option<String>,
    pub created_before: Option<String>,
    pub created_after: Option<String>,
    pub created_between: Option<String>,
    pub last_on: Option<String>,
    pub last_before: Option<String>,
    pub last_after: Option<String>,
    pub last_between: Option<String>,

    pub is_qualified: Option<String>,
}
