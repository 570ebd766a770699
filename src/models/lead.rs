use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::timestamp;

/// Where a lead came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    Website,
    FacebookAds,
    GoogleAds,
    Referral,
    Events,
    Other,
}

impl LeadSource {
    pub const ALL: [LeadSource; 6] = [
        LeadSource::Website,
        LeadSource::FacebookAds,
        LeadSource::GoogleAds,
        LeadSource::Referral,
        LeadSource::Events,
        LeadSource::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::Website => "website",
            LeadSource::FacebookAds => "facebook_ads",
            LeadSource::GoogleAds => "google_ads",
            LeadSource::Referral => "referral",
            LeadSource::Events => "events",
            LeadSource::Other => "other",
        }
    }
}

/// Pipeline position of a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Lost,
    Won,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Lost,
        LeadStatus::Won,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Lost => "lost",
            LeadStatus::Won => "won",
        }
    }
}

/// Error for text that names no known enumeration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! text_enum {
    ($ty:ty, $kind:literal) => {
        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| UnknownVariant { kind: $kind, value: s.to_string() })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(LeadSource, "source");
text_enum!(LeadStatus, "status");

/// A stored lead record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub source: Option<LeadSource>,
    pub status: Option<LeadStatus>,
    pub score: Option<f64>,
    pub lead_value: Option<f64>,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub is_qualified: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Build a fresh record from validated input. Timestamps are both `now`.
    pub fn create(input: NewLead, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            company: input.company,
            city: input.city,
            state: input.state,
            source: input.source,
            status: input.status,
            score: input.score,
            lead_value: input.lead_value,
            last_activity_at: input.last_activity_at,
            is_qualified: input.is_qualified,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge supplied patch fields and stamp `updated_at`
    pub fn apply(&mut self, patch: LeadPatch, now: DateTime<Utc>) {
        if let Some(v) = patch.first_name { self.first_name = v; }
        if let Some(v) = patch.last_name { self.last_name = v; }
        if let Some(v) = patch.email { self.email = v; }
        if let Some(v) = patch.phone { self.phone = v; }
        if let Some(v) = patch.company { self.company = Some(v); }
        if let Some(v) = patch.city { self.city = Some(v); }
        if let Some(v) = patch.state { self.state = Some(v); }
        if let Some(v) = patch.source { self.source = Some(v); }
        if let Some(v) = patch.status { self.status = Some(v); }
        if let Some(v) = patch.score { self.score = Some(v); }
        if let Some(v) = patch.lead_value { self.lead_value = Some(v); }
        if let Some(v) = patch.last_activity_at { self.last_activity_at = Some(v); }
        if let Some(v) = patch.is_qualified { self.is_qualified = Some(v); }
        self.updated_at = now;
    }
}

/// Body of POST /leads/addlead. Required fields are optional here so that a
/// missing field becomes a validation error instead of a JSON rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub source: Option<LeadSource>,
    pub status: Option<LeadStatus>,
    pub score: Option<f64>,
    pub lead_value: Option<f64>,
    #[serde(default, deserialize_with = "timestamp::deserialize_optional")]
    pub last_activity_at: Option<DateTime<Utc>>,
    pub is_qualified: Option<bool>,
}

/// Lead input with every required field present
#[derive(Debug, Clone)]
pub struct NewLead {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub source: Option<LeadSource>,
    pub status: Option<LeadStatus>,
    pub score: Option<f64>,
    pub lead_value: Option<f64>,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub is_qualified: Option<bool>,
}

pub const REQUIRED_FIELDS: [&str; 4] = ["first_name", "last_name", "email", "phone"];

fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl LeadInput {
    /// Check required fields. Empty strings count as missing.
    /// On failure returns the names of the missing fields.
    pub fn validate(self) -> Result<NewLead, Vec<&'static str>> {
        let first_name = present(self.first_name);
        let last_name = present(self.last_name);
        let email = present(self.email);
        let phone = present(self.phone);

        match (first_name, last_name, email, phone) {
            (Some(first_name), Some(last_name), Some(email), Some(phone)) => Ok(NewLead {
                first_name,
                last_name,
                email,
                phone,
                company: self.company,
                city: self.city,
                state: self.state,
                source: self.source,
                status: self.status,
                score: self.score,
                lead_value: self.lead_value,
                last_activity_at: self.last_activity_at,
                is_qualified: self.is_qualified,
            }),
            (first_name, last_name, email, phone) => {
                let found = [first_name.is_some(), last_name.is_some(), email.is_some(), phone.is_some()];
                Err(REQUIRED_FIELDS
                    .iter()
                    .zip(found)
                    .filter(|(_, ok)| !ok)
                    .map(|(name, _)| *name)
                    .collect())
            }
        }
    }
}

/// Body of PUT /leads/editlead/:id. Absent fields are left unchanged;
/// `id` and the timestamps are not accepted from clients.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub source: Option<LeadSource>,
    pub status: Option<LeadStatus>,
    pub score: Option<f64>,
    pub lead_value: Option<f64>,
    #[serde(default, deserialize_with = "timestamp::deserialize_optional")]
    pub last_activity_at: Option<DateTime<Utc>>,
    pub is_qualified: Option<bool>,
}

impl LeadPatch {
    /// Required fields may be omitted from a patch but never blanked
    pub fn blanked_required_fields(&self) -> Vec<&'static str> {
        let supplied = [&self.first_name, &self.last_name, &self.email, &self.phone];
        REQUIRED_FIELDS
            .iter()
            .zip(supplied)
            .filter(|(_, v)| v.as_deref().is_some_and(str::is_empty))
            .map(|(name, _)| *name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input() -> LeadInput {
        serde_json::from_value(json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "phone": "555-0100",
            "status": "new",
            "source": "google_ads",
            "score": 42
        }))
        .unwrap()
    }

    #[test]
    fn enums_round_trip_through_text() {
        for status in LeadStatus::ALL {
            assert_eq!(status.as_str().parse::<LeadStatus>().unwrap(), status);
        }
        for source in LeadSource::ALL {
            assert_eq!(source.to_string().parse::<LeadSource>().unwrap(), source);
        }
        let err = "cold".parse::<LeadStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown status 'cold'");
    }

    #[test]
    fn last_activity_accepts_the_search_date_shapes() {
        let patch: LeadPatch = serde_json::from_value(json!({ "last_activity_at": "2024-03-01" })).unwrap();
        let expected = DateTime::parse_from_rfc3339("2024-03-01T00:00:00Z").unwrap().with_timezone(&Utc);
        assert_eq!(patch.last_activity_at, Some(expected));

        let input: LeadInput = serde_json::from_value(json!({ "last_activity_at": null })).unwrap();
        assert_eq!(input.last_activity_at, None);
        assert!(serde_json::from_value::<LeadPatch>(json!({ "last_activity_at": "soon" })).is_err());
    }

    #[test]
    fn validate_accepts_complete_input() {
        let lead = input().validate().unwrap();
        assert_eq!(lead.email, "ada@example.com");
        assert_eq!(lead.source, Some(LeadSource::GoogleAds));
        assert_eq!(lead.score, Some(42.0));
    }

    #[test]
    fn validate_reports_missing_and_empty_fields() {
        let mut raw = input();
        raw.phone = None;
        raw.first_name = Some(String::new());
        assert_eq!(raw.validate().unwrap_err(), vec!["first_name", "phone"]);
    }

    #[test]
    fn apply_changes_only_supplied_fields() {
        let created = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let later = DateTime::parse_from_rfc3339("2024-02-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let mut lead = Lead::create(input().validate().unwrap(), created);
        let before = lead.clone();

        lead.apply(LeadPatch { city: Some("Paris".into()), ..Default::default() }, later);

        assert_eq!(lead.city.as_deref(), Some("Paris"));
        assert_eq!(lead.first_name, before.first_name);
        assert_eq!(lead.id, before.id);
        assert_eq!(lead.created_at, created);
        assert_eq!(lead.updated_at, later);
    }

    #[test]
    fn patch_ignores_identity_fields_and_flags_blanks() {
        let patch: LeadPatch = serde_json::from_value(json!({
            "id": "not-allowed",
            "created_at": "2020-01-01T00:00:00Z",
            "email": ""
        }))
        .unwrap();
        assert_eq!(patch.blanked_required_fields(), vec!["email"]);
    }
}
