mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

// Validation runs locally before any store call, so these assertions hold
// whether or not a database is reachable.

#[tokio::test]
async fn signup_rejects_password_mismatch_before_touching_the_store() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let payload = json!({
        "email": "mismatch@example.test",
        "password": "abc",
        "confirm_password": "xyz"
    });

    let res = client
        .post(format!("{}/auth/signup", server.base_url))
        .json(&payload)
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(
        body["field_errors"]["confirm_password"].is_string(),
        "expected confirm_password field error: {}",
        body
    );
    Ok(())
}

#[tokio::test]
async fn signup_reports_every_missing_field() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let payload = json!({
        "email": "",
        "password": "",
        "confirm_password": ""
    });

    let res = client
        .post(format!("{}/auth/signup", server.base_url))
        .json(&payload)
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    for field in ["email", "password", "confirm_password"] {
        assert!(
            body["field_errors"][field].is_string(),
            "missing field error for {}: {}",
            field,
            body
        );
    }
    Ok(())
}

#[tokio::test]
async fn login_with_empty_fields_is_a_validation_error() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let payload = json!({ "email": "someone@example.test", "password": "" });

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&payload)
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], false);
    assert!(body["field_errors"]["password"].is_string(), "{}", body);
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for path in [
        "/api/auth/whoami",
        "/api/company",
        "/api/companies/search",
        "/api/tenders",
        "/api/tenders/available",
    ] {
        let res = client
            .get(format!("{}{}", server.base_url, path))
            .send()
            .await?;
        assert_eq!(
            res.status(),
            StatusCode::UNAUTHORIZED,
            "expected 401 for {}",
            path
        );

        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .header("authorization", "Bearer not.a.jwt")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
