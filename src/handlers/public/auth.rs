use axum::Json;
use serde_json::{json, Value};

use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::auth_service::{self, Session, SignInRequest, SignUpRequest};

fn session_body(session: Session) -> Value {
    json!({
        "token": session.token,
        "user": {
            "id": session.user.id,
            "email": session.user.email,
            "company_name": session.user.company_name,
        }
    })
}

/// POST /auth/signup - Register an identity and receive a JWT token
///
/// Expected Input:
/// ```json
/// {
///   "email": "string",            // Required
///   "password": "string",         // Required
///   "confirm_password": "string", // Required, must equal password
///   "company_name": "string"      // Optional, prefills company setup
/// }
/// ```
///
/// Errors: 400 VALIDATION_ERROR (missing fields / password mismatch),
/// 409 CONFLICT (email taken), 503 SERVICE_UNAVAILABLE (store down).
pub async fn signup(Json(payload): Json<SignUpRequest>) -> ApiResult<Value> {
    let session = auth_service::sign_up(payload).await?;
    Ok(ApiResponse::created(session_body(session)))
}

/// POST /auth/login - Authenticate and receive a JWT token
///
/// Expected Input:
/// ```json
/// {
///   "email": "string",    // Required
///   "password": "string"  // Required
/// }
/// ```
///
/// Errors: 400 VALIDATION_ERROR (empty fields), 401 UNAUTHORIZED
/// (unknown email or wrong password).
pub async fn login(Json(payload): Json<SignInRequest>) -> ApiResult<Value> {
    let session = auth_service::sign_in(payload).await?;
    Ok(ApiResponse::success(session_body(session)))
}
