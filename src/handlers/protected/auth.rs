use axum::Extension;
use serde_json::{json, Value};

use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::company_service;

/// GET /api/auth/whoami - Authenticated identity plus its company, if any.
/// The client uses the `company` field to route between the setup form and
/// the dashboard.
pub async fn whoami(Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    let company = company_service::fetch_own_company(user.user_id).await?;
    Ok(ApiResponse::success(json!({
        "user": { "id": user.user_id, "email": user.email },
        "company": company,
    })))
}
