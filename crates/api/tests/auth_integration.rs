//! Integration tests for registration, email verification and login.
//!
//! Run with: cargo test --test auth_integration

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use common::{
    admin_post, enterprise_id, get_request, json_request, login, register, request_with_auth,
    send, test_app, test_app_with_failing_captcha, verification_token, verify, TestEnterprise,
    STRONG_PASSWORD,
};
use domain::models::EnterpriseStatus;
use domain::services::EnterpriseStore;
use serde_json::{json, Value};
use uuid::Uuid;

// ============================================================================
// Registration Tests
// ============================================================================

#[tokio::test]
async fn test_register_business_email_succeeds() {
    let app = test_app().await;
    let enterprise = TestEnterprise::new().with_email(&format!(
        "someone.{}@acme-corp.com",
        Uuid::new_v4().simple()
    ));

    let (status, body) = register(&app, &enterprise).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["message"].as_str().unwrap().contains("verify"));
    assert_eq!(app.captcha.calls(), 1);

    let token = verification_token(&app.mailer, &enterprise.email).unwrap();
    assert_eq!(token.len(), 64);
}

#[tokio::test]
async fn test_register_personal_email_rejected() {
    let app = test_app().await;
    let enterprise = TestEnterprise::new().with_email("someone@gmail.com");

    let (status, body) = register(&app, &enterprise).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "PERSONAL_EMAIL");
    assert!(body["error"].as_str().unwrap().contains("@gmail.com"));
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email_case_insensitive() {
    let app = test_app().await;
    let tag = Uuid::new_v4().simple().to_string();
    let first = TestEnterprise::new().with_email(&format!("A{}@X-corp.com", tag));
    let second = TestEnterprise::new().with_email(&format!("a{}@x-corp.com", tag));

    let (status, _) = register(&app, &first).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = register(&app, &second).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "EMAIL_EXISTS");
}

#[tokio::test]
async fn test_register_weak_password_rejected() {
    let app = test_app().await;
    let mut enterprise = TestEnterprise::new();
    enterprise.password = "abc12345".to_string();

    let (status, body) = register(&app, &enterprise).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body.get("code").is_none());

    enterprise.password = "Abc12345!".to_string();
    let (status, _) = register(&app, &enterprise).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_missing_fields() {
    let app = test_app().await;

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/auth/register",
            json!({"email": "lan@acme-corp.com", "password": STRONG_PASSWORD}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    // Field presence is checked before the CAPTCHA
    assert_eq!(app.captcha.calls(), 0);
}

#[tokio::test]
async fn test_register_captcha_failure_blocks() {
    let app = test_app_with_failing_captcha().await;
    let enterprise = TestEnterprise::new();

    let (status, body) = register(&app, &enterprise).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("CAPTCHA"));
    assert!(app
        .store
        .find_by_email(&enterprise.email)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_register_malformed_json_uses_envelope() {
    let app = test_app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app.router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid request body");
}

// ============================================================================
// Verification Tests
// ============================================================================

#[tokio::test]
async fn test_verify_unknown_token() {
    let app = test_app().await;

    let (status, body) = verify(&app, "deadbeef").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_verify_missing_token() {
    let app = test_app().await;

    let (status, body) = send(&app.router, get_request("/auth/verify")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_verify_expired_token() {
    let app = test_app().await;
    let enterprise = TestEnterprise::new();
    register(&app, &enterprise).await;
    let token = verification_token(&app.mailer, &enterprise.email).unwrap();

    app.store
        .set_token_expiry(&enterprise.email, Utc::now() - Duration::minutes(1))
        .await
        .unwrap();

    let (status, body) = verify(&app, &token).await;
    assert_eq!(status, StatusCode::GONE);
    assert_eq!(body["code"], "TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_verify_twice_reports_already_verified() {
    let app = test_app().await;
    let enterprise = TestEnterprise::new();
    register(&app, &enterprise).await;
    let token = verification_token(&app.mailer, &enterprise.email).unwrap();

    let (status, body) = verify(&app, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body.get("alreadyVerified").is_none());

    let (status, body) = verify(&app, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["alreadyVerified"], true);

    let stored = app
        .store
        .find_by_email(&enterprise.email)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, EnterpriseStatus::PendingReview);
}

#[tokio::test]
async fn test_verify_after_rejection_is_invalid() {
    let app = test_app().await;
    let enterprise = TestEnterprise::new();
    register(&app, &enterprise).await;
    let token = verification_token(&app.mailer, &enterprise.email).unwrap();

    let id = enterprise_id(&app, &enterprise.email).await;
    let (status, _) = admin_post(&app, &format!("/admin/enterprises/{}/reject", id)).await;
    assert_eq!(status, StatusCode::OK);

    // The email was never confirmed, so the old link must not report success
    let (status, body) = verify(&app, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_TOKEN");

    let stored = app
        .store
        .find_by_email(&enterprise.email)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, EnterpriseStatus::Rejected);
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_status_gates() {
    let app = test_app().await;
    let enterprise = TestEnterprise::new();
    register(&app, &enterprise).await;

    let (status, body) = login(&app, &enterprise.email, &enterprise.password).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "UNVERIFIED_EMAIL");

    let token = verification_token(&app.mailer, &enterprise.email).unwrap();
    verify(&app, &token).await;
    let (status, body) = login(&app, &enterprise.email, &enterprise.password).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "PENDING_REVIEW");

    let id = enterprise_id(&app, &enterprise.email).await;
    admin_post(&app, &format!("/admin/enterprises/{}/approve", id)).await;
    admin_post(&app, &format!("/admin/enterprises/{}/suspend", id)).await;
    let (status, body) = login(&app, &enterprise.email, &enterprise.password).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "SUSPENDED");

    admin_post(&app, &format!("/admin/enterprises/{}/reject", id)).await;
    let (status, body) = login(&app, &enterprise.email, &enterprise.password).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "REJECTED");
}

#[tokio::test]
async fn test_login_wrong_password_matches_unknown_email() {
    let app = test_app().await;
    let (enterprise, _) = common::active_enterprise(&app).await;

    let (wrong_status, wrong_body) = login(&app, &enterprise.email, "Wrong-Pass1").await;
    let (unknown_status, unknown_body) =
        login(&app, "nobody@nowhere-corp.com", "Wrong-Pass1").await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert!(wrong_body.get("code").is_none());
}

#[tokio::test]
async fn test_login_wrong_password_on_pending_account_is_generic() {
    let app = test_app().await;
    let enterprise = TestEnterprise::new();
    register(&app, &enterprise).await;

    let (status, body) = login(&app, &enterprise.email, "Wrong-Pass1").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("code").is_none());
}

#[tokio::test]
async fn test_login_missing_credentials() {
    let app = test_app().await;

    let (status, body) = send(
        &app.router,
        json_request(Method::POST, "/auth/login", json!({"email": "a@acme-corp.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

// ============================================================================
// End-to-end
// ============================================================================

fn decode_claims(token: &str) -> Value {
    let payload = token.split('.').nth(1).unwrap();
    let bytes = URL_SAFE_NO_PAD.decode(payload).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_register_verify_approve_login_flow() {
    let app = test_app().await;
    let mut enterprise = TestEnterprise::new();
    enterprise.name = "Nguyễn Văn An".to_string();
    enterprise.company = "Công ty Đông Á".to_string();

    let (status, _) = register(&app, &enterprise).await;
    assert_eq!(status, StatusCode::OK);

    let token = verification_token(&app.mailer, &enterprise.email).unwrap();
    let (status, _) = verify(&app, &token).await;
    assert_eq!(status, StatusCode::OK);

    let id = enterprise_id(&app, &enterprise.email).await;
    let (status, body) = admin_post(&app, &format!("/admin/enterprises/{}/approve", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains(&enterprise.email));
    assert_eq!(app.mailer.sent_to(&enterprise.email).len(), 2);

    let (status, body) = login(&app, &enterprise.email, &enterprise.password).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["id"], id.as_str());
    assert_eq!(body["user"]["name"], enterprise.name.as_str());

    let session = body["token"].as_str().unwrap();
    let claims = decode_claims(session);
    assert_eq!(claims["sub"], id.as_str());
    assert_eq!(claims["name"], enterprise.name.as_str());
    assert_eq!(claims["company"], enterprise.company.as_str());
    assert_eq!(claims["email"], enterprise.email.as_str());
    assert!(claims["exp"].as_i64().unwrap() > claims["iat"].as_i64().unwrap());

    let (status, body) = send(
        &app.router,
        request_with_auth(Method::GET, "/user/profile", session),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["status"], "active");
    assert_eq!(body["profile"]["company"], enterprise.company.as_str());
    assert!(body["profile"]["created_at"].is_i64());
}

#[tokio::test]
async fn test_profile_requires_valid_session() {
    let app = test_app().await;

    let (status, body) = send(&app.router, get_request("/user/profile")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &app.router,
        request_with_auth(Method::GET, "/user/profile", "not.a.jwt"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, session) = common::active_enterprise(&app).await;
    let signature_start = session.rfind('.').unwrap() + 1;
    let index = signature_start + 5;
    let original = session.as_bytes()[index];
    let mut tampered = session.clone();
    tampered.replace_range(
        index..index + 1,
        if original == b'x' { "y" } else { "x" },
    );
    let (status, _) = send(
        &app.router,
        request_with_auth(Method::GET, "/user/profile", &tampered),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
