//! Per-turn orchestration: input normalization, turn limiting, prompt
//! compilation, session reads/writes, and recovery of every completion
//! failure into fixed user-facing reply text.
//!
//! No error kind escapes this boundary; the caller always receives a
//! plain-text reply.

use std::sync::Arc;

use crate::prompt::{self, Mode};
use crate::provider::{CompletionError, CompletionProvider, CompletionRequest, Message};
use crate::session::SessionStore;
use crate::transcript::TranscriptSink;

/// Maximum successful exchanges per session. Failed turns do not count.
pub const TURN_LIMIT: u32 = 40;

pub const EMPTY_INPUT_REPLY: &str = "Please type a message first.";

pub const LIMIT_REACHED_REPLY: &str = "You have reached the question limit for this free demo session. \
Click 'New Chat' to start a fresh conversation.";

pub const NETWORK_ERROR_REPLY: &str =
    "Network error while contacting the AI service. Please try again.";

pub const PARSE_ERROR_REPLY: &str = "Sorry, something went wrong reading the AI response.";

/// Reply for a non-success provider status, carrying the code for
/// diagnostics.
pub fn upstream_error_reply(status: u16) -> String {
    format!("The AI service returned an error (code {status}). Please try again after some time.")
}

/// Composes prompt compiler, session store, completion provider, and
/// transcript sink for each incoming message.
pub struct TurnOrchestrator {
    session: SessionStore,
    provider: Arc<dyn CompletionProvider>,
    transcript: Arc<dyn TranscriptSink>,
}

impl TurnOrchestrator {
    pub fn new(
        session: SessionStore,
        provider: Arc<dyn CompletionProvider>,
        transcript: Arc<dyn TranscriptSink>,
    ) -> Self {
        Self {
            session,
            provider,
            transcript,
        }
    }

    /// Handle one user message and return the reply shown to the end user.
    ///
    /// Session state is mutated only after a successful completion; every
    /// failure path leaves history and the turn counter untouched.
    pub async fn handle_message(&self, raw_message: &str, raw_mode: &str) -> String {
        let message = raw_message.trim();
        if message.is_empty() {
            return EMPTY_INPUT_REPLY.to_string();
        }

        let mode = Mode::parse(raw_mode);

        if self.session.turn_count().await >= TURN_LIMIT {
            tracing::info!(limit = TURN_LIMIT, "Turn limit reached, refusing completion");
            return LIMIT_REACHED_REPLY.to_string();
        }

        let request = CompletionRequest {
            system_prompt: prompt::system_prompt(mode),
            history: self.session.history().await,
            user_message: message.to_string(),
        };

        // The upstream call runs on its own task: if the caller abandons
        // the request mid-flight, the call still completes but its result
        // is dropped with the join handle, never applied to the session.
        let provider = Arc::clone(&self.provider);
        let outcome = match tokio::spawn(async move { provider.complete(request).await }).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Completion task aborted");
                return NETWORK_ERROR_REPLY.to_string();
            }
        };

        let reply = match outcome {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(mode = %mode, error = %e, "Completion failed");
                return match e {
                    CompletionError::Network(_) => NETWORK_ERROR_REPLY.to_string(),
                    CompletionError::Upstream { status } => upstream_error_reply(status),
                    CompletionError::Parse(_) => PARSE_ERROR_REPLY.to_string(),
                };
            }
        };

        self.session
            .append_exchange(Message::user(message), Message::assistant(reply.clone()))
            .await;
        let turn = self.session.increment_turn().await;
        self.transcript.record(message, &reply, mode);

        tracing::info!(mode = %mode, turn, "Completed turn");
        reply
    }

    /// Clear the session. No interaction with the completion provider.
    pub async fn reset(&self) {
        self.session.reset().await;
        tracing::info!("Session reset");
    }
}
