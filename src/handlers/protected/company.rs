use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use serde::Deserialize;

use crate::database::models::{Company, ServiceTag};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::company_service::{self, CompanyHit, CompanyPatch, NewCompany};

#[derive(Debug, Deserialize)]
pub struct ServiceTagRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Free-text query; empty means "match everything".
    #[serde(default)]
    pub q: String,
    /// Industry facet; empty or "All" disables the facet filter.
    #[serde(default)]
    pub industry: String,
}

/// GET /api/company - The caller's own company profile
///
/// 404 before the setup flow has run; the client shows the setup form then.
pub async fn get(Extension(user): Extension<AuthUser>) -> ApiResult<Company> {
    let company = company_service::fetch_own_company(user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("No company profile for this account"))?;
    Ok(ApiResponse::success(company))
}

/// POST /api/company - Create the caller's company profile
///
/// Required: name, industry (one of the enumerated set). One profile per
/// account: a second create returns 409.
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewCompany>,
) -> ApiResult<Company> {
    let company = company_service::create_company(user.user_id, payload).await?;
    Ok(ApiResponse::created(company))
}

/// PATCH /api/company - Partial profile edit; absent fields are kept
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CompanyPatch>,
) -> ApiResult<Company> {
    let company = company_service::update_company(user.user_id, payload).await?;
    Ok(ApiResponse::success(company))
}

/// POST /api/company/services - Add a service/expertise tag
///
/// Duplicate names are a no-op. Returns the full tag list.
pub async fn add_service(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ServiceTagRequest>,
) -> ApiResult<Vec<ServiceTag>> {
    let tags = company_service::add_service_tag(
        user.user_id,
        &payload.name,
        payload.description.as_deref(),
    )
    .await?;
    Ok(ApiResponse::success(tags))
}

/// DELETE /api/company/services/:name - Remove a tag; absent names are a no-op
pub async fn remove_service(
    Extension(user): Extension<AuthUser>,
    Path(name): Path<String>,
) -> ApiResult<Vec<ServiceTag>> {
    let tags = company_service::remove_service_tag(user.user_id, &name).await?;
    Ok(ApiResponse::success(tags))
}

/// GET /api/companies/search?q=&industry= - Directory search
///
/// Case-insensitive substring over name, description, and service tags;
/// exact industry facet. Stable order, no ranking.
pub async fn search(Query(params): Query<SearchQuery>) -> ApiResult<Vec<CompanyHit>> {
    let hits = company_service::search_companies(&params.q, &params.industry).await?;
    Ok(ApiResponse::success(hits))
}
