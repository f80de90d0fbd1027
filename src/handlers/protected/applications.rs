use axum::{extract::Path, Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Application;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::tender_service::{self, Decision};

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub decision: Decision,
}

/// POST /api/applications/:id/decision - Accept or reject a pending
/// application (tender owner only)
///
/// Expected Input:
/// ```json
/// { "decision": "accept" }   // or "reject"
/// ```
///
/// 403 when the caller does not own the tender, 409 once decided.
pub async fn decide(
    Extension(user): Extension<AuthUser>,
    Path(application_id): Path<Uuid>,
    Json(payload): Json<DecisionRequest>,
) -> ApiResult<Application> {
    let application =
        tender_service::decide_application(user.user_id, application_id, payload.decision).await?;
    Ok(ApiResponse::success(application))
}
