//! Server-side session state: bounded history window plus turn counter.
//!
//! The store holds the single shared conversation. The orchestrator is the
//! sole writer; reads happen only while composing a request. All access is
//! serialized behind one mutex, which is never held across an await point.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::provider::Message;

/// Maximum stored history entries (10 user/assistant exchanges).
pub const HISTORY_CAP: usize = 20;

#[derive(Debug, Default)]
struct SessionState {
    /// Ordered turns, oldest first. Always an even count: exchanges are
    /// appended as user/assistant pairs.
    history: Vec<Message>,
    turn_count: u32,
}

/// Cheaply cloneable handle to the shared session.
///
/// An explicit handle rather than a process global, so per-turn logic
/// stays unchanged if multiple sessions are ever introduced.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<SessionState>>,
}

impl SessionStore {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored history, oldest first.
    pub async fn history(&self) -> Vec<Message> {
        self.inner.lock().await.history.clone()
    }

    /// Append one completed exchange, evicting the oldest entries when the
    /// window exceeds `HISTORY_CAP`. Callers supply well-formed turns.
    pub async fn append_exchange(&self, user: Message, assistant: Message) {
        let mut state = self.inner.lock().await;
        state.history.push(user);
        state.history.push(assistant);

        if state.history.len() > HISTORY_CAP {
            let excess = state.history.len() - HISTORY_CAP;
            state.history.drain(..excess);
        }
    }

    /// Clear history and zero the turn counter.
    pub async fn reset(&self) {
        let mut state = self.inner.lock().await;
        state.history.clear();
        state.turn_count = 0;
    }

    /// Increment the turn counter, returning the new value.
    pub async fn increment_turn(&self) -> u32 {
        let mut state = self.inner.lock().await;
        state.turn_count += 1;
        state.turn_count
    }

    /// Current turn counter.
    pub async fn turn_count(&self) -> u32 {
        self.inner.lock().await.turn_count
    }
}
