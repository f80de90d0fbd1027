use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::company::{is_known_industry, Company, INDUSTRIES};
use crate::database::models::ServiceTag;
use crate::search::{self, SearchRecord};

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Invalid company profile")]
    Validation { field_errors: HashMap<String, String> },

    #[error("Company profile not found")]
    NotFound,

    #[error("A company profile already exists for this account")]
    AlreadyExists,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

#[derive(Debug, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub industry: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub logo_url: Option<String>,
}

/// Partial profile edit: absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub logo_url: Option<String>,
}

/// Directory entry as returned by search: profile plus service tags.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyHit {
    pub id: Uuid,
    pub name: String,
    pub industry: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub services: Vec<String>,
}

impl SearchRecord for CompanyHit {
    fn haystacks(&self) -> Vec<&str> {
        let mut hay = vec![self.name.as_str()];
        if let Some(desc) = &self.description {
            hay.push(desc.as_str());
        }
        hay.extend(self.services.iter().map(|s| s.as_str()));
        hay
    }

    fn facet(&self) -> &str {
        &self.industry
    }
}

pub fn validate_new_company(fields: &NewCompany) -> Result<(), DirectoryError> {
    let mut field_errors = HashMap::new();
    if fields.name.trim().is_empty() {
        field_errors.insert("name".to_string(), "This field is required".to_string());
    }
    if fields.industry.trim().is_empty() {
        field_errors.insert("industry".to_string(), "This field is required".to_string());
    } else if !is_known_industry(&fields.industry) {
        field_errors.insert(
            "industry".to_string(),
            format!("Must be one of: {}", INDUSTRIES.join(", ")),
        );
    }
    validate_url_field(&mut field_errors, "website", fields.website.as_deref());
    validate_url_field(&mut field_errors, "logo_url", fields.logo_url.as_deref());

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(DirectoryError::Validation { field_errors })
    }
}

fn validate_url_field(
    field_errors: &mut HashMap<String, String>,
    field: &str,
    value: Option<&str>,
) {
    if let Some(v) = value {
        if !v.is_empty() && url::Url::parse(v).is_err() {
            field_errors.insert(field.to_string(), "Must be a valid URL".to_string());
        }
    }
}

/// Company owned by the authenticated identity, or None before setup.
pub async fn fetch_own_company(user_id: Uuid) -> Result<Option<Company>, DirectoryError> {
    let pool = DatabaseManager::pool().await?;
    let company = DatabaseManager::guarded(
        sqlx::query_as("SELECT * FROM companies WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&pool),
    )
    .await?;
    Ok(company)
}

/// One company per identity: a second create is a 409, not a silent upsert.
pub async fn create_company(user_id: Uuid, fields: NewCompany) -> Result<Company, DirectoryError> {
    validate_new_company(&fields)?;

    if fetch_own_company(user_id).await?.is_some() {
        return Err(DirectoryError::AlreadyExists);
    }

    let pool = DatabaseManager::pool().await?;
    let company: Company = DatabaseManager::guarded(
        sqlx::query_as(
            "INSERT INTO companies \
             (user_id, name, industry, description, website, phone, address, logo_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(user_id)
        .bind(fields.name.trim())
        .bind(&fields.industry)
        .bind(&fields.description)
        .bind(&fields.website)
        .bind(&fields.phone)
        .bind(&fields.address)
        .bind(&fields.logo_url)
        .fetch_one(&pool),
    )
    .await?;

    info!("Created company {} for user {}", company.id, user_id);
    Ok(company)
}

/// Partial merge over the caller's own company. Read-modify-write with a
/// fresh updated_at stamp: last write wins across devices.
pub async fn update_company(user_id: Uuid, patch: CompanyPatch) -> Result<Company, DirectoryError> {
    let current = fetch_own_company(user_id)
        .await?
        .ok_or(DirectoryError::NotFound)?;

    let merged = NewCompany {
        name: patch.name.unwrap_or(current.name),
        industry: patch.industry.unwrap_or(current.industry),
        description: patch.description.or(current.description),
        website: patch.website.or(current.website),
        phone: patch.phone.or(current.phone),
        address: patch.address.or(current.address),
        logo_url: patch.logo_url.or(current.logo_url),
    };
    validate_new_company(&merged)?;

    let pool = DatabaseManager::pool().await?;
    let company: Company = DatabaseManager::guarded(
        sqlx::query_as(
            "UPDATE companies SET name = $1, industry = $2, description = $3, website = $4, \
             phone = $5, address = $6, logo_url = $7, updated_at = now() \
             WHERE id = $8 RETURNING *",
        )
        .bind(merged.name.trim())
        .bind(&merged.industry)
        .bind(&merged.description)
        .bind(&merged.website)
        .bind(&merged.phone)
        .bind(&merged.address)
        .bind(&merged.logo_url)
        .bind(current.id)
        .fetch_one(&pool),
    )
    .await?;

    Ok(company)
}

pub async fn list_service_tags(company_id: Uuid) -> Result<Vec<ServiceTag>, DirectoryError> {
    let pool = DatabaseManager::pool().await?;
    let tags = DatabaseManager::guarded(
        sqlx::query_as(
            "SELECT * FROM goods_services WHERE company_id = $1 ORDER BY created_at, name",
        )
        .bind(company_id)
        .fetch_all(&pool),
    )
    .await?;
    Ok(tags)
}

/// Adding a duplicate tag (exact string match) is a no-op.
pub async fn add_service_tag(
    user_id: Uuid,
    name: &str,
    description: Option<&str>,
) -> Result<Vec<ServiceTag>, DirectoryError> {
    let name = name.trim();
    if name.is_empty() {
        let mut field_errors = HashMap::new();
        field_errors.insert("name".to_string(), "This field is required".to_string());
        return Err(DirectoryError::Validation { field_errors });
    }

    let company = fetch_own_company(user_id)
        .await?
        .ok_or(DirectoryError::NotFound)?;

    let pool = DatabaseManager::pool().await?;
    DatabaseManager::guarded(
        sqlx::query(
            "INSERT INTO goods_services (company_id, name, description) VALUES ($1, $2, $3) \
             ON CONFLICT (company_id, name) DO NOTHING",
        )
        .bind(company.id)
        .bind(name)
        .bind(description)
        .execute(&pool),
    )
    .await?;

    list_service_tags(company.id).await
}

/// Removing a non-member tag is a no-op.
pub async fn remove_service_tag(
    user_id: Uuid,
    name: &str,
) -> Result<Vec<ServiceTag>, DirectoryError> {
    let company = fetch_own_company(user_id)
        .await?
        .ok_or(DirectoryError::NotFound)?;

    let pool = DatabaseManager::pool().await?;
    DatabaseManager::guarded(
        sqlx::query("DELETE FROM goods_services WHERE company_id = $1 AND name = $2")
            .bind(company.id)
            .bind(name)
            .execute(&pool),
    )
    .await?;

    list_service_tags(company.id).await
}

/// Directory search: load the page of companies with their tags, then run
/// the in-memory filter. Hits keep store order (newest profile first).
pub async fn search_companies(
    query: &str,
    industry: &str,
) -> Result<Vec<CompanyHit>, DirectoryError> {
    let pool = DatabaseManager::pool().await?;
    let page_size = config::config().api.search_page_size;

    let companies: Vec<Company> = DatabaseManager::guarded(
        sqlx::query_as("SELECT * FROM companies ORDER BY created_at DESC LIMIT $1")
            .bind(page_size)
            .fetch_all(&pool),
    )
    .await?;

    let tags: Vec<ServiceTag> = DatabaseManager::guarded(
        sqlx::query_as("SELECT * FROM goods_services ORDER BY created_at").fetch_all(&pool),
    )
    .await?;

    let mut tags_by_company: HashMap<Uuid, Vec<String>> = HashMap::new();
    for tag in tags {
        tags_by_company.entry(tag.company_id).or_default().push(tag.name);
    }

    let hits: Vec<CompanyHit> = companies
        .into_iter()
        .map(|c| CompanyHit {
            services: tags_by_company.remove(&c.id).unwrap_or_default(),
            id: c.id,
            name: c.name,
            industry: c.industry,
            description: c.description,
            website: c.website,
            logo_url: c.logo_url,
        })
        .collect();

    Ok(search::search(&hits, query, industry)
        .into_iter()
        .cloned()
        .collect())
}
