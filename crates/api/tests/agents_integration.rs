//! Integration tests for the agent catalog and agent requests.
//!
//! Run with: cargo test --test agents_integration

mod common;

use axum::http::{Method, StatusCode};
use common::{
    active_enterprise, admin_post, enterprise_id, get_request, json_request_with_auth, login,
    register, request_with_auth, send, test_app, verification_token, verify, TestApp,
    TestEnterprise,
};
use serde_json::{json, Value};

async fn request_agent(
    app: &TestApp,
    session: &str,
    agent_type_id: &str,
    name: &str,
) -> (StatusCode, Value) {
    send(
        &app.router,
        json_request_with_auth(
            Method::POST,
            "/user/agents/request",
            json!({"agent_type_id": agent_type_id, "instance_name": name}),
            session,
        ),
    )
    .await
}

#[tokio::test]
async fn test_catalog_lists_only_active_types() {
    let app = test_app().await;

    let (status, body) = send(&app.router, get_request("/agents")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let agents = body["agents"].as_array().unwrap();
    let ids: Vec<&str> = agents.iter().map(|a| a["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["customer-support", "sales-assistant"]);
    assert!(agents[0].get("status").is_none());
    assert_eq!(agents[1]["industry"], "Retail");
}

#[tokio::test]
async fn test_request_agent_and_list_own() {
    let app = test_app().await;
    let (_, session) = active_enterprise(&app).await;

    let (status, body) = request_agent(&app, &session, "sales-assistant", "Shop helper").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app.router,
        request_with_auth(Method::GET, "/user/agents", &session),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let agents = body["agents"].as_array().unwrap();
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0]["id"], id.as_str());
    assert_eq!(agents[0]["instance_name"], "Shop helper");
    assert_eq!(agents[0]["status"], "pending");
    assert_eq!(agents[0]["agent_type_name"], "Sales Assistant");
    assert!(agents[0]["requested_at"].is_i64());
    assert!(agents[0]["approved_at"].is_null());
}

#[tokio::test]
async fn test_duplicate_request_until_rejected() {
    let app = test_app().await;
    let (_, session) = active_enterprise(&app).await;

    let (status, body) = request_agent(&app, &session, "sales-assistant", "First").await;
    assert_eq!(status, StatusCode::OK);
    let first = body["id"].as_str().unwrap().to_string();

    let (status, body) = request_agent(&app, &session, "sales-assistant", "Second").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE");

    // A different agent type is independent
    let (status, _) = request_agent(&app, &session, "customer-support", "Support").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = admin_post(&app, &format!("/admin/agent-requests/{}/reject", first)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request_agent(&app, &session, "sales-assistant", "Second").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_request_validation() {
    let app = test_app().await;
    let (_, session) = active_enterprise(&app).await;

    let (status, _) = request_agent(&app, &session, "sales-assistant", "   ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request_agent(&app, &session, "no-such-agent", "Bot").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request_agent(&app, &session, "legacy-bot", "Bot").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_requires_active_account() {
    let app = test_app().await;
    let (enterprise, session) = active_enterprise(&app).await;

    let id = enterprise_id(&app, &enterprise.email).await;
    let (status, _) = admin_post(&app, &format!("/admin/enterprises/{}/suspend", id)).await;
    assert_eq!(status, StatusCode::OK);

    // The session is still cryptographically valid
    let (status, body) = request_agent(&app, &session, "sales-assistant", "Bot").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_user_routes_require_session() {
    let app = test_app().await;

    let (status, _) = send(&app.router, get_request("/user/agents")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The admin secret is not a session token
    let (status, _) = request_agent(&app, common::ADMIN_SECRET, "sales-assistant", "Bot").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_agent_activation_flow() {
    let app = test_app().await;
    let enterprise = TestEnterprise::new();
    register(&app, &enterprise).await;
    let token = verification_token(&app.mailer, &enterprise.email).unwrap();
    verify(&app, &token).await;
    let id = enterprise_id(&app, &enterprise.email).await;
    admin_post(&app, &format!("/admin/enterprises/{}/approve", id)).await;
    let (_, body) = login(&app, &enterprise.email, &enterprise.password).await;
    let session = body["token"].as_str().unwrap().to_string();

    let (_, body) = request_agent(&app, &session, "customer-support", "Helpdesk").await;
    let request_id = body["id"].as_str().unwrap().to_string();

    let (status, body) =
        admin_post(&app, &format!("/admin/agent-requests/{}/approve", request_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("Helpdesk"));

    let activation = app.mailer.sent_to(&enterprise.email);
    let last = activation.last().unwrap();
    assert!(last.html.contains("Helpdesk"));
    assert!(last.html.contains("Customer Support Assistant"));
    assert!(last.html.contains("https://portal.test/dashboard"));

    let (_, body) = send(
        &app.router,
        request_with_auth(Method::GET, "/user/agents", &session),
    )
    .await;
    assert_eq!(body["agents"][0]["status"], "active");
    assert!(body["agents"][0]["approved_at"].is_i64());

    // Still outstanding while active
    let (status, body) = request_agent(&app, &session, "customer-support", "Again").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE");
}
