use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Accepted values for `tenders.category`.
pub const CATEGORIES: &[&str] = &[
    "Technology",
    "Design",
    "Marketing",
    "Infrastructure",
    "Consulting",
    "Analytics",
    "E-commerce",
];

pub fn is_known_category(value: &str) -> bool {
    CATEGORIES.contains(&value)
}

/// Tender lifecycle. Owner-controlled; there is no automatic expiry, the
/// deadline is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenderStatus {
    Draft,
    Active,
    Closed,
}

impl TenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenderStatus::Draft => "draft",
            TenderStatus::Active => "active",
            TenderStatus::Closed => "closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(TenderStatus::Draft),
            "active" => Some(TenderStatus::Active),
            "closed" => Some(TenderStatus::Closed),
            _ => None,
        }
    }

    /// Legal forward transitions: draft -> active -> closed.
    pub fn can_transition_to(&self, next: TenderStatus) -> bool {
        matches!(
            (self, next),
            (TenderStatus::Draft, TenderStatus::Active)
                | (TenderStatus::Active, TenderStatus::Closed)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tender {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub budget: Option<Decimal>,
    pub deadline: NaiveDate,
    pub category: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tender row plus the derived applications count, as listed on dashboards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TenderSummary {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub budget: Option<Decimal>,
    pub deadline: NaiveDate,
    pub category: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub applications_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips() {
        for s in [TenderStatus::Draft, TenderStatus::Active, TenderStatus::Closed] {
            assert_eq!(TenderStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(TenderStatus::parse("expired"), None);
    }

    #[test]
    fn only_forward_transitions_are_legal() {
        assert!(TenderStatus::Draft.can_transition_to(TenderStatus::Active));
        assert!(TenderStatus::Active.can_transition_to(TenderStatus::Closed));
        assert!(!TenderStatus::Closed.can_transition_to(TenderStatus::Active));
        assert!(!TenderStatus::Draft.can_transition_to(TenderStatus::Closed));
        assert!(!TenderStatus::Active.can_transition_to(TenderStatus::Active));
    }
}
