use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Accepted values for `companies.industry`. Stored as TEXT, validated here.
pub const INDUSTRIES: &[&str] = &[
    "Technology",
    "Manufacturing",
    "Healthcare",
    "Finance",
    "Construction",
    "Education",
    "Retail",
    "Transportation",
    "Energy",
    "Agriculture",
    "Other",
];

pub fn is_known_industry(value: &str) -> bool {
    INDUSTRIES.contains(&value)
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub industry: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn industry_membership_is_exact_match() {
        assert!(is_known_industry("Technology"));
        assert!(!is_known_industry("technology"));
        assert!(!is_known_industry("Tech"));
    }
}
