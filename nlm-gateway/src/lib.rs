//! NLM Chat Gateway - Session-oriented front for an LLM completion API.
//!
//! This crate provides the gateway service:
//! - Mode-to-prompt compilation
//! - Bounded conversation history with a turn limit
//! - Single-shot completion calls to OpenRouter with classified failures
//! - Best-effort Q&A transcript logging
//!
//! ## Architecture
//!
//! ```text
//! Client → Routes → Orchestrator (limit check → prompt → history)
//!                        ↓
//!                  Completion provider → OpenRouter
//!                        ↓
//!                  Session write + transcript → reply
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod routes;
pub mod session;
pub mod transcript;

pub use orchestrator::{TurnOrchestrator, TURN_LIMIT};
pub use prompt::{system_prompt, Mode};
pub use provider::{
    CompletionError, CompletionProvider, CompletionRequest, Message, OpenRouterProvider, Role,
};
pub use session::{SessionStore, HISTORY_CAP};
pub use transcript::{FileTranscript, TranscriptSink};

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use nlm_common::config::Config;
use routes::AppState;

/// Build the gateway router from configuration, wiring the real provider
/// and file transcript.
pub fn build_router(config: &Config) -> Router {
    let session = SessionStore::new();
    let provider = Arc::new(OpenRouterProvider::new(&config.provider));
    let transcript = Arc::new(FileTranscript::new(&config.transcript.path));
    let orchestrator = Arc::new(TurnOrchestrator::new(session, provider, transcript));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::build_routes(AppState { orchestrator }).layer(cors)
}

/// Start the gateway server.
pub async fn start_server(config: &Config) -> anyhow::Result<()> {
    config.validate()?;

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    let router = build_router(config);

    tracing::info!("Starting NLM Gateway on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
