use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::errors::ApiError;
use crate::history::{ChatTurn, HistoryStore};

/// Read side of the chat history the pipeline depends on. The retention
/// bound is supplied by the caller; the store does not filter on its own.
#[async_trait]
pub trait ConversationHistory: Send + Sync {
    async fn recent_turns(
        &self,
        session_id: &str,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ChatTurn>, ApiError>;
}

#[async_trait]
impl ConversationHistory for HistoryStore {
    async fn recent_turns(
        &self,
        session_id: &str,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ChatTurn>, ApiError> {
        HistoryStore::recent_turns(self, session_id, since, limit).await
    }
}

/// The last N turns of a session within the retention window, oldest
/// first. String formatting is deferred to the prompt boundary.
#[derive(Debug, Clone, Default)]
pub struct ConversationWindow {
    turns: Vec<ChatTurn>,
}

impl ConversationWindow {
    pub fn new(turns: Vec<ChatTurn>) -> Self {
        Self { turns }
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Renders the window as a `User:`/`Assistant:` transcript for prompt
    /// construction.
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for turn in &self.turns {
            out.push_str("User: ");
            out.push_str(&turn.question);
            out.push_str("\nAssistant: ");
            out.push_str(&turn.answer);
            out.push('\n');
        }
        out
    }
}
