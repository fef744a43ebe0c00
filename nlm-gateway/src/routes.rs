//! Route definitions for the NLM chat gateway.
//!
//! The chat endpoint always answers with HTTP 200 and a reply string;
//! completion failures are communicated in-band as reply text, never as a
//! distinct failure status.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::orchestrator::TurnOrchestrator;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<TurnOrchestrator>,
}

/// Chat request body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub mode: String,
}

/// Chat response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Reset response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResetResponse {
    pub status: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
}

/// Build the router with all gateway routes.
pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/chat", post(chat_handler))
        .route("/api/v1/reset", post(reset_handler))
        .route("/api/v1/health", get(health_handler))
        .with_state(state)
}

/// Handle one user message.
async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let reply = state
        .orchestrator
        .handle_message(&request.message, &request.mode)
        .await;

    Json(ChatResponse { reply })
}

/// Clear the server-side session.
async fn reset_handler(State(state): State<AppState>) -> Json<ResetResponse> {
    state.orchestrator.reset().await;
    Json(ResetResponse {
        status: "ok".to_string(),
    })
}

/// Liveness probe.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: "nlm-gateway".to_string(),
    })
}
