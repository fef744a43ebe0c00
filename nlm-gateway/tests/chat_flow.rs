//! End-to-end tests for the chat gateway: real router, real OpenRouter
//! provider, mock upstream.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nlm_common::config::ProviderConfig;
use nlm_gateway::orchestrator::{upstream_error_reply, TurnOrchestrator, EMPTY_INPUT_REPLY};
use nlm_gateway::routes::{build_routes, AppState};
use nlm_gateway::{Message, Mode, OpenRouterProvider, SessionStore, TranscriptSink};

/// Discards transcript records; route tests don't assert on the log file.
struct NullSink;

impl TranscriptSink for NullSink {
    fn record(&self, _question: &str, _answer: &str, _mode: Mode) {}
}

/// Gateway wired against the given upstream base URL, plus a handle to its
/// session store for state assertions.
fn gateway(base_url: &str) -> (Router, SessionStore) {
    let session = SessionStore::new();
    let provider = Arc::new(OpenRouterProvider::new(&ProviderConfig {
        api_key: Some("test-key".to_string()),
        base_url: base_url.to_string(),
        ..ProviderConfig::default()
    }));
    let orchestrator = Arc::new(TurnOrchestrator::new(
        session.clone(),
        provider,
        Arc::new(NullSink),
    ));

    (build_routes(AppState { orchestrator }), session)
}

async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_chat_round_trip_updates_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": " A stack is LIFO. "}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (router, session) = gateway(&server.uri());

    let (status, body) = post_json(
        &router,
        "/api/v1/chat",
        json!({"message": "What is a stack?", "mode": "mca"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"reply": "A stack is LIFO."}));

    let history = session.history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], Message::user("What is a stack?"));
    assert_eq!(history[1], Message::assistant("A stack is LIFO."));
    assert_eq!(session.turn_count().await, 1);
}

#[tokio::test]
async fn test_upstream_failure_reported_in_band() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (router, session) = gateway(&server.uri());
    session
        .append_exchange(Message::user("q"), Message::assistant("a"))
        .await;
    session.increment_turn().await;

    let (status, body) = post_json(
        &router,
        "/api/v1/chat",
        json!({"message": "hi", "mode": "general"}),
    )
    .await;

    // Always an HTTP success; the failure is in the reply text.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], upstream_error_reply(500));

    assert_eq!(session.history().await.len(), 2);
    assert_eq!(session.turn_count().await, 1);
}

#[tokio::test]
async fn test_empty_message_prompts_for_input() {
    // No mock mounted: the upstream must not be consulted at all.
    let server = MockServer::start().await;
    let (router, session) = gateway(&server.uri());

    let (status, body) = post_json(
        &router,
        "/api/v1/chat",
        json!({"message": "   ", "mode": "general"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], EMPTY_INPUT_REPLY);
    assert!(session.history().await.is_empty());
    assert_eq!(session.turn_count().await, 0);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_mode_defaults_to_general() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "hello"}}]
        })))
        .mount(&server)
        .await;

    let (router, _) = gateway(&server.uri());
    let (_, body) = post_json(&router, "/api/v1/chat", json!({"message": "hi"})).await;
    assert_eq!(body["reply"], "hello");

    let requests = server.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let system = sent["messages"][0]["content"].as_str().unwrap();
    assert!(system.contains("general knowledge"));
    assert_eq!(sent["messages"][0]["role"], "system");
    assert_eq!(sent["messages"][1], json!({"role": "user", "content": "hi"}));
}

#[tokio::test]
async fn test_reset_clears_session() {
    let server = MockServer::start().await;
    let (router, session) = gateway(&server.uri());
    session
        .append_exchange(Message::user("q"), Message::assistant("a"))
        .await;
    session.increment_turn().await;

    let (status, body) = post_json(&router, "/api/v1/reset", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
    assert!(session.history().await.is_empty());
    assert_eq!(session.turn_count().await, 0);
}

#[tokio::test]
async fn test_health_reports_service() {
    let server = MockServer::start().await;
    let (router, _) = gateway(&server.uri());

    let response = router
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "nlm-gateway");
}
