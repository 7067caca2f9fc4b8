use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};

use gatekeeper_bot::domain::repository::CodeLedger;
use gatekeeper_bot::router::build_router;

use crate::helpers::test_state;

#[tokio::test]
async fn should_report_running_on_index() {
    let server = TestServer::new(build_router(test_state(None, None))).unwrap();

    let res = server.get("/").await;
    res.assert_status_ok();
    let body: Value = res.json();
    assert_eq!(body["ok"], true);
    assert_eq!(body["msg"], "Bot is running");
}

#[tokio::test]
async fn should_answer_health_probes() {
    let server = TestServer::new(build_router(test_state(None, None))).unwrap();

    server.get("/healthz").await.assert_status_ok();
    server.get("/readyz").await.assert_status_ok();
}

#[tokio::test]
async fn should_accept_unrecognized_update_without_touching_ledger() {
    let state = test_state(None, None);
    let ledger = state.ledger.clone();
    let server = TestServer::new(build_router(state)).unwrap();

    let res = server
        .post("/webhook")
        .json(&json!({ "edited_message": { "chat": { "id": 1 } } }))
        .await;
    res.assert_status_ok();
    let body: Value = res.json();
    assert_eq!(body["ok"], true);

    assert!(ledger.find(42).await.unwrap().is_none());
}

#[tokio::test]
async fn should_reject_malformed_payload() {
    let server = TestServer::new(build_router(test_state(None, None))).unwrap();

    let res = server
        .post("/webhook")
        .add_header(axum::http::header::CONTENT_TYPE, "application/json")
        .bytes("{ not json".into())
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_reject_missing_secret_token() {
    let state = test_state(Some("s3cret"), None);
    let ledger = state.ledger.clone();
    let server = TestServer::new(build_router(state)).unwrap();

    let res = server
        .post("/webhook")
        .json(&json!({ "message": { "chat": { "id": 42 }, "text": "/start" } }))
        .await;
    res.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = res.json();
    assert_eq!(body["kind"], "INVALID_WEBHOOK_SECRET");

    assert!(ledger.find(42).await.unwrap().is_none());
}

#[tokio::test]
async fn should_reject_wrong_secret_token() {
    let server = TestServer::new(build_router(test_state(Some("s3cret"), None))).unwrap();

    let res = server
        .post("/webhook")
        .add_header("x-telegram-bot-api-secret-token", "wrong")
        .json(&json!({ "edited_message": {} }))
        .await;
    res.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_accept_matching_secret_token() {
    let server = TestServer::new(build_router(test_state(Some("s3cret"), None))).unwrap();

    let res = server
        .post("/webhook")
        .add_header("x-telegram-bot-api-secret-token", "s3cret")
        .json(&json!({ "edited_message": {} }))
        .await;
    res.assert_status_ok();
}

#[tokio::test]
async fn should_refuse_registration_without_configured_url() {
    let server = TestServer::new(build_router(test_state(None, None))).unwrap();

    let res = server.post("/webhook/registration").await;
    res.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["kind"], "MISSING_WEBHOOK_URL");
}
