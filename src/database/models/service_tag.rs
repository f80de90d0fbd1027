use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Service/expertise tag (`goods_services` row). Set semantics per company:
/// uniqueness is on (company_id, name) by exact string match.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceTag {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
