use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::auth::{self, password, Claims};
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::User;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing required fields: {0:?}")]
    MissingFields(Vec<&'static str>),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Email is already registered")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Token generation failed: {0}")]
    Token(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// Optional company name hint, prefills the profile setup form later.
    pub company_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Signed-in user plus the bearer token for subsequent calls.
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// All validation happens before any store call (re-prompt semantics:
/// the client fixes the form and re-submits).
pub fn validate_sign_up(req: &SignUpRequest) -> Result<(), AuthError> {
    let mut missing = Vec::new();
    if req.email.trim().is_empty() {
        missing.push("email");
    }
    if req.password.is_empty() {
        missing.push("password");
    }
    if req.confirm_password.is_empty() {
        missing.push("confirm_password");
    }
    if !missing.is_empty() {
        return Err(AuthError::MissingFields(missing));
    }
    if req.password != req.confirm_password {
        return Err(AuthError::PasswordMismatch);
    }
    Ok(())
}

pub fn validate_sign_in(req: &SignInRequest) -> Result<(), AuthError> {
    let mut missing = Vec::new();
    if req.email.trim().is_empty() {
        missing.push("email");
    }
    if req.password.is_empty() {
        missing.push("password");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AuthError::MissingFields(missing))
    }
}

pub async fn sign_up(req: SignUpRequest) -> Result<Session, AuthError> {
    validate_sign_up(&req)?;

    let email = req.email.trim().to_lowercase();
    let pool = DatabaseManager::pool().await?;

    let existing: Option<User> = DatabaseManager::guarded(
        sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&pool),
    )
    .await?;
    if existing.is_some() {
        return Err(AuthError::EmailTaken);
    }

    let password_hash = password::hash(&req.password).map_err(AuthError::Hash)?;

    let user: User = DatabaseManager::guarded(
        sqlx::query_as(
            "INSERT INTO users (email, password_hash, company_name) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&email)
        .bind(&password_hash)
        .bind(&req.company_name)
        .fetch_one(&pool),
    )
    .await?;

    info!("Registered user {}", user.id);

    let token = issue_token(&user)?;
    Ok(Session { user, token })
}

pub async fn sign_in(req: SignInRequest) -> Result<Session, AuthError> {
    validate_sign_in(&req)?;

    let email = req.email.trim().to_lowercase();
    let pool = DatabaseManager::pool().await?;

    let user: Option<User> = DatabaseManager::guarded(
        sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&pool),
    )
    .await?;

    let user = user.ok_or(AuthError::InvalidCredentials)?;

    let ok = password::verify(&req.password, &user.password_hash).map_err(AuthError::Hash)?;
    if !ok {
        return Err(AuthError::InvalidCredentials);
    }

    let token = issue_token(&user)?;
    Ok(Session { user, token })
}

fn issue_token(user: &User) -> Result<String, AuthError> {
    auth::generate_jwt(Claims::new(user.id, user.email.clone()))
        .map_err(|e| AuthError::Token(e.to_string()))
}
