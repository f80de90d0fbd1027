use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Registered identity. Companies hang off a user one-to-one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Company name hint captured at signup, used to prefill the setup form.
    pub company_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
