use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::tender::is_known_category;
use crate::database::models::{
    Application, ApplicationStatus, Company, Tender, TenderStatus, TenderSummary,
};
use crate::search::{self, SearchRecord};
use crate::services::company_service;

#[derive(Debug, Error)]
pub enum TenderError {
    #[error("Missing required fields: {missing:?}")]
    Validation { missing: Vec<&'static str> },

    #[error("Tender not found")]
    NotFound,

    #[error("Application not found")]
    ApplicationNotFound,

    #[error("Only the owning company may perform this operation")]
    NotOwner,

    #[error("Caller has no company profile")]
    NoCompany,

    #[error("A company cannot apply to its own tender")]
    SelfApplication,

    #[error("This company has already applied to this tender")]
    DuplicateApplication,

    #[error("Tender is not open for applications")]
    NotOpen,

    #[error("Cannot move tender from {from} to {to}")]
    InvalidTransition { from: String, to: &'static str },

    #[error("Application has already been decided")]
    AlreadyDecided,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

#[derive(Debug, Deserialize)]
pub struct NewTender {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub requirements: Option<String>,
    pub budget: Option<Decimal>,
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub category: String,
    /// Defaults to active; draft lets an owner stage a posting first.
    pub status: Option<TenderStatus>,
}

#[derive(Debug, Deserialize)]
pub struct NewApplication {
    #[serde(default)]
    pub proposal_text: String,
    pub proposed_budget: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accept,
    Reject,
}

impl SearchRecord for TenderSummary {
    fn haystacks(&self) -> Vec<&str> {
        let mut hay = vec![self.title.as_str(), self.description.as_str()];
        if let Some(req) = &self.requirements {
            hay.push(req.as_str());
        }
        hay.push(self.category.as_str());
        hay
    }

    fn facet(&self) -> &str {
        &self.category
    }
}

/// All-or-nothing submission: every missing field is reported and nothing
/// is persisted until the whole form passes.
pub fn validate_new_tender(fields: &NewTender) -> Result<(), TenderError> {
    let mut missing = Vec::new();
    if fields.title.trim().is_empty() {
        missing.push("title");
    }
    if fields.description.trim().is_empty() {
        missing.push("description");
    }
    if fields.budget.is_none() {
        missing.push("budget");
    }
    if fields.deadline.is_none() {
        missing.push("deadline");
    }
    if fields.category.trim().is_empty() || !is_known_category(&fields.category) {
        missing.push("category");
    }
    if !missing.is_empty() {
        return Err(TenderError::Validation { missing });
    }
    // A tender may start as draft or active; closed is only reachable
    // through the close transition.
    if fields.status == Some(TenderStatus::Closed) {
        return Err(TenderError::InvalidTransition {
            from: "new".to_string(),
            to: TenderStatus::Closed.as_str(),
        });
    }
    Ok(())
}

async fn require_company(user_id: Uuid) -> Result<Company, TenderError> {
    company_service::fetch_own_company(user_id)
        .await
        .map_err(|e| match e {
            company_service::DirectoryError::Database(db) => TenderError::Database(db),
            _ => TenderError::NoCompany,
        })?
        .ok_or(TenderError::NoCompany)
}

const SUMMARY_SELECT: &str = "SELECT t.*, \
    (SELECT count(*) FROM applications a WHERE a.tender_id = t.id) AS applications_count \
    FROM tenders t";

/// Caller's own tenders, most recently created first.
pub async fn list_own_tenders(user_id: Uuid) -> Result<Vec<TenderSummary>, TenderError> {
    let company = require_company(user_id).await?;
    let pool = DatabaseManager::pool().await?;

    let sql = format!("{} WHERE t.company_id = $1 ORDER BY t.created_at DESC", SUMMARY_SELECT);
    let tenders = DatabaseManager::guarded(
        sqlx::query_as(&sql).bind(company.id).fetch_all(&pool),
    )
    .await?;
    Ok(tenders)
}

/// Active tenders from other companies, newest first, optionally narrowed by
/// the in-memory query/category filter.
pub async fn list_available_tenders(
    user_id: Uuid,
    query: &str,
    category: &str,
) -> Result<Vec<TenderSummary>, TenderError> {
    let company = require_company(user_id).await?;
    let pool = DatabaseManager::pool().await?;
    let page_size = config::config().api.search_page_size;

    let sql = format!(
        "{} WHERE t.status = 'active' AND t.company_id <> $1 \
         ORDER BY t.created_at DESC LIMIT $2",
        SUMMARY_SELECT
    );
    let tenders: Vec<TenderSummary> = DatabaseManager::guarded(
        sqlx::query_as(&sql)
            .bind(company.id)
            .bind(page_size)
            .fetch_all(&pool),
    )
    .await?;

    Ok(search::search(&tenders, query, category)
        .into_iter()
        .cloned()
        .collect())
}

pub async fn create_tender(user_id: Uuid, fields: NewTender) -> Result<Tender, TenderError> {
    validate_new_tender(&fields)?;
    let company = require_company(user_id).await?;

    let status = fields.status.unwrap_or(TenderStatus::Active);
    let pool = DatabaseManager::pool().await?;
    let tender: Tender = DatabaseManager::guarded(
        sqlx::query_as(
            "INSERT INTO tenders \
             (company_id, title, description, requirements, budget, deadline, category, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(company.id)
        .bind(fields.title.trim())
        .bind(fields.description.trim())
        .bind(&fields.requirements)
        .bind(fields.budget)
        .bind(fields.deadline)
        .bind(&fields.category)
        .bind(status.as_str())
        .fetch_one(&pool),
    )
    .await?;

    info!("Company {} posted tender {}", company.id, tender.id);
    Ok(tender)
}

async fn fetch_tender(tender_id: Uuid) -> Result<Tender, TenderError> {
    let pool = DatabaseManager::pool().await?;
    let tender: Option<Tender> = DatabaseManager::guarded(
        sqlx::query_as("SELECT * FROM tenders WHERE id = $1")
            .bind(tender_id)
            .fetch_optional(&pool),
    )
    .await?;
    tender.ok_or(TenderError::NotFound)
}

/// Owner-only status transition. `publish` moves draft -> active,
/// `close` moves active -> closed; anything else is rejected.
pub async fn transition_tender(
    user_id: Uuid,
    tender_id: Uuid,
    target: TenderStatus,
) -> Result<Tender, TenderError> {
    let company = require_company(user_id).await?;
    let tender = fetch_tender(tender_id).await?;
    if tender.company_id != company.id {
        return Err(TenderError::NotOwner);
    }

    let current = TenderStatus::parse(&tender.status).ok_or(TenderError::InvalidTransition {
        from: tender.status.clone(),
        to: target.as_str(),
    })?;
    if !current.can_transition_to(target) {
        return Err(TenderError::InvalidTransition {
            from: tender.status.clone(),
            to: target.as_str(),
        });
    }

    let pool = DatabaseManager::pool().await?;
    let updated: Tender = DatabaseManager::guarded(
        sqlx::query_as(
            "UPDATE tenders SET status = $1, updated_at = now() WHERE id = $2 RETURNING *",
        )
        .bind(target.as_str())
        .bind(tender.id)
        .fetch_one(&pool),
    )
    .await?;

    info!("Tender {} moved {} -> {}", tender.id, tender.status, target.as_str());
    Ok(updated)
}

/// Submit an application against an active tender. Self-applications and
/// repeat applications by the same company are rejected.
pub async fn apply_to_tender(
    user_id: Uuid,
    tender_id: Uuid,
    fields: NewApplication,
) -> Result<Application, TenderError> {
    if fields.proposal_text.trim().is_empty() {
        return Err(TenderError::Validation {
            missing: vec!["proposal_text"],
        });
    }

    let company = require_company(user_id).await?;
    let tender = fetch_tender(tender_id).await?;

    if tender.company_id == company.id {
        return Err(TenderError::SelfApplication);
    }
    if TenderStatus::parse(&tender.status) != Some(TenderStatus::Active) {
        return Err(TenderError::NotOpen);
    }

    let pool = DatabaseManager::pool().await?;
    let existing: Option<Application> = DatabaseManager::guarded(
        sqlx::query_as("SELECT * FROM applications WHERE tender_id = $1 AND company_id = $2")
            .bind(tender.id)
            .bind(company.id)
            .fetch_optional(&pool),
    )
    .await?;
    if existing.is_some() {
        return Err(TenderError::DuplicateApplication);
    }

    // Two submissions can race past the duplicate check; the unique
    // constraint on (tender_id, company_id) settles it and the loser gets
    // the same duplicate error as the fast path.
    let application: Application = DatabaseManager::guarded(
        sqlx::query_as(
            "INSERT INTO applications (tender_id, company_id, proposal_text, proposed_budget) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(tender.id)
        .bind(company.id)
        .bind(fields.proposal_text.trim())
        .bind(fields.proposed_budget)
        .fetch_one(&pool),
    )
    .await
    .map_err(application_insert_error)?;

    info!("Company {} applied to tender {}", company.id, tender.id);
    Ok(application)
}

fn application_insert_error(err: DatabaseError) -> TenderError {
    match err {
        DatabaseError::Sqlx(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            TenderError::DuplicateApplication
        }
        other => TenderError::Database(other),
    }
}

/// Applications received on a tender; visible to the tender owner only.
pub async fn list_applications(
    user_id: Uuid,
    tender_id: Uuid,
) -> Result<Vec<Application>, TenderError> {
    let company = require_company(user_id).await?;
    let tender = fetch_tender(tender_id).await?;
    if tender.company_id != company.id {
        return Err(TenderError::NotOwner);
    }

    let pool = DatabaseManager::pool().await?;
    let applications = DatabaseManager::guarded(
        sqlx::query_as("SELECT * FROM applications WHERE tender_id = $1 ORDER BY created_at DESC")
            .bind(tender.id)
            .fetch_all(&pool),
    )
    .await?;
    Ok(applications)
}

/// Accept or reject a pending application; tender owner only, decided once.
pub async fn decide_application(
    user_id: Uuid,
    application_id: Uuid,
    decision: Decision,
) -> Result<Application, TenderError> {
    let company = require_company(user_id).await?;

    let pool = DatabaseManager::pool().await?;
    let application: Option<Application> = DatabaseManager::guarded(
        sqlx::query_as("SELECT * FROM applications WHERE id = $1")
            .bind(application_id)
            .fetch_optional(&pool),
    )
    .await?;
    let application = application.ok_or(TenderError::ApplicationNotFound)?;

    let tender = fetch_tender(application.tender_id).await?;
    if tender.company_id != company.id {
        return Err(TenderError::NotOwner);
    }
    if ApplicationStatus::parse(&application.status) != Some(ApplicationStatus::Pending) {
        return Err(TenderError::AlreadyDecided);
    }

    let status = match decision {
        Decision::Accept => ApplicationStatus::Accepted,
        Decision::Reject => ApplicationStatus::Rejected,
    };

    let updated: Application = DatabaseManager::guarded(
        sqlx::query_as(
            "UPDATE applications SET status = $1, updated_at = now() WHERE id = $2 RETURNING *",
        )
        .bind(status.as_str())
        .bind(application.id)
        .fetch_one(&pool),
    )
    .await?;

    info!(
        "Application {} on tender {} marked {}",
        application.id,
        tender.id,
        status.as_str()
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_tender() -> NewTender {
        NewTender {
            title: "Website redesign".into(),
            description: "Full rebuild of the marketing site".into(),
            requirements: None,
            budget: Some(Decimal::new(15_000, 0)),
            deadline: NaiveDate::from_ymd_opt(2026, 12, 1),
            category: "Design".into(),
            status: None,
        }
    }

    #[test]
    fn complete_submission_passes() {
        assert!(validate_new_tender(&new_tender()).is_ok());
    }

    #[test]
    fn any_missing_field_rejects_the_whole_submission() {
        let mut fields = new_tender();
        fields.deadline = None;
        let err = validate_new_tender(&fields).unwrap_err();
        match err {
            TenderError::Validation { missing } => assert_eq!(missing, vec!["deadline"]),
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn all_missing_fields_are_listed() {
        let fields = NewTender {
            title: String::new(),
            description: String::new(),
            requirements: None,
            budget: None,
            deadline: None,
            category: String::new(),
            status: None,
        };
        let err = validate_new_tender(&fields).unwrap_err();
        match err {
            TenderError::Validation { missing } => {
                assert_eq!(
                    missing,
                    vec!["title", "description", "budget", "deadline", "category"]
                );
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn a_tender_cannot_be_created_already_closed() {
        let mut fields = new_tender();
        fields.status = Some(TenderStatus::Closed);
        let err = validate_new_tender(&fields).unwrap_err();
        match err {
            TenderError::InvalidTransition { to, .. } => assert_eq!(to, "closed"),
            other => panic!("expected InvalidTransition, got {:?}", other),
        }

        fields.status = Some(TenderStatus::Draft);
        assert!(validate_new_tender(&fields).is_ok());
        fields.status = Some(TenderStatus::Active);
        assert!(validate_new_tender(&fields).is_ok());
    }

    #[derive(Debug)]
    struct UniqueViolation;

    impl std::fmt::Display for UniqueViolation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("duplicate key value violates unique constraint")
        }
    }

    impl std::error::Error for UniqueViolation {}

    impl sqlx::error::DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn concurrent_duplicate_insert_reports_duplicate_application() {
        let err = DatabaseError::Sqlx(sqlx::Error::Database(Box::new(UniqueViolation)));
        assert!(matches!(
            application_insert_error(err),
            TenderError::DuplicateApplication
        ));

        let timeout = DatabaseError::Timeout(5);
        assert!(matches!(
            application_insert_error(timeout),
            TenderError::Database(_)
        ));
    }

    #[test]
    fn unknown_category_counts_as_missing() {
        let mut fields = new_tender();
        fields.category = "Landscaping".into();
        let err = validate_new_tender(&fields).unwrap_err();
        match err {
            TenderError::Validation { missing } => assert_eq!(missing, vec!["category"]),
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    fn summary(title: &str, description: &str, category: &str) -> TenderSummary {
        TenderSummary {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            requirements: None,
            budget: None,
            deadline: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            category: category.into(),
            status: "active".into(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            applications_count: 0,
        }
    }

    #[test]
    fn tender_search_matches_title_description_and_category_facet() {
        let tenders = vec![
            summary("Mobile app build", "iOS and Android", "Technology"),
            summary("Brand refresh", "New logo and palette", "Design"),
        ];

        let hits = search::search(&tenders, "android", "");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Mobile app build");

        let facet_hits = search::search(&tenders, "", "Design");
        assert_eq!(facet_hits.len(), 1);
        assert_eq!(facet_hits[0].title, "Brand refresh");

        // identity filter preserves order
        let all = search::search(&tenders, "", "All");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "Mobile app build");
    }
}
