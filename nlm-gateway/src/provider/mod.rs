//! Completion provider abstraction for the chat gateway.
//!
//! Defines the unified request type, the error taxonomy for a single
//! completion attempt, and the trait seam the orchestrator calls through.
//! The OpenRouter implementation lives in `openrouter`.

mod openrouter;

pub use openrouter::OpenRouterProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Message Types
// ============================================================================

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Synthesized instruction turn, never stored in history
    System,
    /// End-user message
    User,
    /// Model reply
    Assistant,
}

impl Role {
    /// String representation matching the wire format.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One turn of a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

// ============================================================================
// Request / Error Types
// ============================================================================

/// A single completion request as assembled by the orchestrator.
///
/// Model identity and sampling parameters are fixed per provider instance
/// (from configuration), not per request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Compiled system instruction for the selected mode.
    pub system_prompt: String,
    /// Stored history, oldest first. Excludes the system turn.
    pub history: Vec<Message>,
    /// The new user message, appended last.
    pub user_message: String,
}

/// Failure of a single completion attempt.
///
/// Each variant maps to exactly one fixed user-facing reply at the
/// orchestrator boundary. No retries: a failure is surfaced once as the
/// final result for that turn.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Provider unreachable, or the request timed out
    #[error("network error contacting completion provider: {0}")]
    Network(String),

    /// Provider answered with a non-success status code
    #[error("completion provider returned status {status}")]
    Upstream { status: u16 },

    /// Success status, but the body was missing the expected completion
    #[error("completion provider response was malformed: {0}")]
    Parse(String),
}

// ============================================================================
// Provider Trait
// ============================================================================

/// Unified interface to the upstream chat-completion endpoint.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Issue one completion request and return the trimmed reply text.
    ///
    /// Must not mutate any session state; classification of failures is
    /// the only processing beyond the network call itself.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}
