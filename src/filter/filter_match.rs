use super::filter::LeadFilter;
use super::types::{Constraint, FilterValue};
use crate::models::Lead;

impl<T: FilterValue> Constraint<T> {
    /// Evaluate against a field value. A missing value never matches,
    /// the same way a SQL comparison against NULL is never true.
    pub fn matches(&self, value: Option<&T>) -> bool {
        let Some(value) = value else { return false };
        match self {
            Constraint::Equals(expected) => value == expected,
            Constraint::Contains(needle) => value.contains_ci(needle),
            Constraint::InSet(set) => set.iter().any(|candidate| candidate == value),
            Constraint::Range { min, max } => value >= min && value <= max,
            Constraint::GreaterThan(bound) => value > bound,
            Constraint::LessThan(bound) => value < bound,
        }
    }
}

fn all<T: FilterValue>(constraints: &[Constraint<T>], value: Option<&T>) -> bool {
    constraints.iter().all(|c| c.matches(value))
}

impl LeadFilter {
    pub fn matches(&self, lead: &Lead) -> bool {
        if let Some(text) = &self.text {
            let candidates = [
                Some(&lead.first_name),
                Some(&lead.last_name),
                Some(&lead.email),
                lead.company.as_ref(),
                lead.city.as_ref(),
            ];
            if !candidates.into_iter().flatten().any(|field| field.contains_ci(text)) {
                return false;
            }
        }

        all(&self.email, Some(&lead.email))
            && all(&self.company, lead.company.as_ref())
            && all(&self.city, lead.city.as_ref())
            && all(&self.status, lead.status.as_ref())
            && all(&self.source, lead.source.as_ref())
            && all(&self.score, lead.score.as_ref())
            && all(&self.lead_value, lead.lead_value.as_ref())
            && all(&self.created_at, Some(&lead.created_at))
            && all(&self.last_activity_at, lead.last_activity_at.as_ref())
            && self.is_qualified.map_or(true, |flag| lead.is_qualified == Some(flag))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::filter::SearchParams;
    use crate::models::LeadStatus;

    fn lead(first: &str, company: Option<&str>, score: Option<f64>, status: Option<LeadStatus>) -> Lead {
        let now: DateTime<Utc> = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z").unwrap().with_timezone(&Utc);
        Lead {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            last_name: "Doe".to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            phone: "555-0100".to_string(),
            company: company.map(str::to_string),
            city: None,
            state: None,
            source: None,
            status,
            score,
            lead_value: None,
            last_activity_at: None,
            is_qualified: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn matching<'a>(leads: &'a [Lead], params: SearchParams) -> Vec<&'a str> {
        let filter = LeadFilter::from_params(&params).unwrap();
        leads.iter().filter(|l| filter.matches(l)).map(|l| l.first_name.as_str()).collect()
    }

    #[test]
    fn score_range_and_bounds_select_middle_lead() {
        let leads = [
            lead("A", None, Some(10.0), None),
            lead("B", None, Some(20.0), None),
            lead("C", None, Some(30.0), None),
            lead("D", None, None, None),
        ];

        let between = SearchParams { score_between: Some("15,25".into()), ..Default::default() };
        assert_eq!(matching(&leads, between), vec!["B"]);

        let bounds = SearchParams { score_gt: Some("10".into()), score_lt: Some("30".into()), ..Default::default() };
        assert_eq!(matching(&leads, bounds), vec!["B"]);

        let inclusive = SearchParams { score_between: Some("10,20".into()), ..Default::default() };
        assert_eq!(matching(&leads, inclusive), vec!["A", "B"]);
    }

    #[test]
    fn free_text_is_case_insensitive_across_fields() {
        let leads = [
            lead("Acmeson", None, None, None),
            lead("Bob", Some("ACME Corp"), None, None),
            lead("Carol", Some("Globex"), None, None),
        ];
        let params = SearchParams { q: Some("acme".into()), ..Default::default() };
        assert_eq!(matching(&leads, params), vec!["Acmeson", "Bob"]);
    }

    #[test]
    fn status_set_membership() {
        let leads = [
            lead("A", None, None, Some(LeadStatus::New)),
            lead("B", None, None, Some(LeadStatus::Won)),
            lead("C", None, None, Some(LeadStatus::Lost)),
            lead("D", None, None, None),
        ];
        let params = SearchParams { status_in: Some("new,won".into()), ..Default::default() };
        assert_eq!(matching(&leads, params), vec!["A", "B"]);
    }

    #[test]
    fn qualification_flag_is_strict() {
        let mut yes = lead("Yes", None, None, None);
        yes.is_qualified = Some(true);
        let mut no = lead("No", None, None, None);
        no.is_qualified = Some(false);
        let unknown = lead("Unknown", None, None, None);
        let leads = [yes, no, unknown];

        let q = |v: Option<&str>| SearchParams { is_qualified: v.map(str::to_string), ..Default::default() };
        assert_eq!(matching(&leads, q(Some("true"))), vec!["Yes"]);
        assert_eq!(matching(&leads, q(Some("false"))), vec!["No"]);
        assert_eq!(matching(&leads, q(Some("nope"))), vec!["No"]);
        assert_eq!(matching(&leads, q(None)), vec!["Yes", "No", "Unknown"]);
    }

    #[test]
    fn contains_match_overrides_exact_company() {
        let leads = [lead("A", Some("Acme"), None, None), lead("B", Some("Acme Labs"), None, None)];
        let params = SearchParams {
            company: Some("Acme".into()),
            company_contains: Some("labs".into()),
            ..Default::default()
        };
        assert_eq!(matching(&leads, params), vec!["B"]);
    }
}
