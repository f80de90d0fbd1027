use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Application, Tender, TenderStatus, TenderSummary};
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::tender_service::{self, NewApplication, NewTender};

#[derive(Debug, Default, Deserialize)]
pub struct AvailableQuery {
    #[serde(default)]
    pub q: String,
    /// Category facet; empty or "All" disables the facet filter.
    #[serde(default)]
    pub category: String,
}

/// GET /api/tenders - The caller's own tenders, newest first, with
/// application counts
pub async fn list_own(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<TenderSummary>> {
    let tenders = tender_service::list_own_tenders(user.user_id).await?;
    Ok(ApiResponse::success(tenders))
}

/// POST /api/tenders - Publish a tender
///
/// All of title, description, budget, deadline, category are required;
/// any missing field rejects the whole submission and nothing is stored.
/// Status defaults to active (pass "status": "draft" to stage it).
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewTender>,
) -> ApiResult<Tender> {
    let tender = tender_service::create_tender(user.user_id, payload).await?;
    Ok(ApiResponse::created(tender))
}

/// GET /api/tenders/available?q=&category= - Active tenders from other
/// companies, search-filtered
pub async fn list_available(
    Extension(user): Extension<AuthUser>,
    Query(params): Query<AvailableQuery>,
) -> ApiResult<Vec<TenderSummary>> {
    let tenders =
        tender_service::list_available_tenders(user.user_id, &params.q, &params.category).await?;
    Ok(ApiResponse::success(tenders))
}

/// POST /api/tenders/:id/publish - draft -> active (owner only)
pub async fn publish(
    Extension(user): Extension<AuthUser>,
    Path(tender_id): Path<Uuid>,
) -> ApiResult<Tender> {
    let tender =
        tender_service::transition_tender(user.user_id, tender_id, TenderStatus::Active).await?;
    Ok(ApiResponse::success(tender))
}

/// POST /api/tenders/:id/close - active -> closed (owner only)
pub async fn close(
    Extension(user): Extension<AuthUser>,
    Path(tender_id): Path<Uuid>,
) -> ApiResult<Tender> {
    let tender =
        tender_service::transition_tender(user.user_id, tender_id, TenderStatus::Closed).await?;
    Ok(ApiResponse::success(tender))
}

/// POST /api/tenders/:id/applications - Apply to an active tender
///
/// Rejected with 409 for self-application, duplicates, and closed/draft
/// tenders; 400 when the proposal text is empty.
pub async fn apply(
    Extension(user): Extension<AuthUser>,
    Path(tender_id): Path<Uuid>,
    Json(payload): Json<NewApplication>,
) -> ApiResult<Application> {
    let application = tender_service::apply_to_tender(user.user_id, tender_id, payload).await?;
    Ok(ApiResponse::created(application))
}

/// GET /api/tenders/:id/applications - Applications received (owner only)
pub async fn list_applications(
    Extension(user): Extension<AuthUser>,
    Path(tender_id): Path<Uuid>,
) -> ApiResult<Vec<Application>> {
    let applications = tender_service::list_applications(user.user_id, tender_id).await?;
    Ok(ApiResponse::success(applications))
}
