use std::sync::Arc;

use chrono::Utc;

use super::compose::Compose;
use super::retrieve::{Retrieve, RetrieveError};
use super::rewrite::Rewrite;
use super::window::{ConversationHistory, ConversationWindow};
use super::{AnswerOutcome, PipelineError};
use crate::core::config::AppConfig;
use crate::index::{IndexHandle, IndexStatus};
use crate::llm::LlmError;

/// End-to-end orchestration for one question.
///
/// Holds no per-request state; concurrent calls share the collaborators.
/// The pipeline is read-only with respect to history and index: persisting
/// the resulting turn is the caller's job.
pub struct AnswerPipeline {
    history: Arc<dyn ConversationHistory>,
    rewriter: Arc<dyn Rewrite>,
    retriever: Arc<dyn Retrieve>,
    composer: Arc<dyn Compose>,
    index: IndexHandle,
    top_k: usize,
    history_limit: i64,
    retention: chrono::Duration,
}

impl AnswerPipeline {
    pub fn new(
        history: Arc<dyn ConversationHistory>,
        rewriter: Arc<dyn Rewrite>,
        retriever: Arc<dyn Retrieve>,
        composer: Arc<dyn Compose>,
        index: IndexHandle,
        config: &AppConfig,
    ) -> Self {
        Self {
            history,
            rewriter,
            retriever,
            composer,
            index,
            top_k: config.top_k,
            history_limit: config.history_limit as i64,
            retention: config.retention_window(),
        }
    }

    /// Answers `question`, optionally using `session_id` for
    /// conversational context.
    pub async fn answer(
        &self,
        question: &str,
        session_id: Option<&str>,
    ) -> Result<AnswerOutcome, PipelineError> {
        if !matches!(self.index.status(), IndexStatus::Ready(_)) {
            tracing::info!("Answer requested while index is not ready");
            return Ok(AnswerOutcome::NotReady);
        }

        let search_query = self.resolve_search_query(question, session_id).await;

        let chunks = match self.retriever.search(&search_query, self.top_k).await {
            Ok(chunks) => chunks,
            // The handle can flip between our readiness check and the
            // search; treat that the same as not ready.
            Err(RetrieveError::IndexNotReady) => return Ok(AnswerOutcome::NotReady),
            Err(RetrieveError::Embedding(LlmError::Timeout)) => {
                return Err(PipelineError::UpstreamTimeout("retrieval"))
            }
            Err(RetrieveError::Embedding(err)) => return Err(PipelineError::Retrieval(err)),
        };

        if chunks.is_empty() {
            tracing::warn!("No relevant chunks found for query");
            return Ok(AnswerOutcome::NoRelevantContent);
        }

        tracing::info!("Found {} relevant chunks", chunks.len());

        // The original question goes to the composer; the rewritten one
        // was only for retrieval.
        match self.composer.compose(question, &chunks).await {
            Ok(text) => Ok(AnswerOutcome::Answer(text)),
            Err(LlmError::Timeout) => Err(PipelineError::UpstreamTimeout("generation")),
            Err(err) => Err(PipelineError::Generation(err)),
        }
    }

    /// Uses the rewritten question for retrieval when the session has
    /// recent history; the raw question otherwise. Rewrite and history
    /// failures degrade to the raw question.
    async fn resolve_search_query(&self, question: &str, session_id: Option<&str>) -> String {
        let Some(session_id) = session_id else {
            return question.to_string();
        };

        let since = Utc::now() - self.retention;
        let turns = match self
            .history
            .recent_turns(session_id, since, self.history_limit)
            .await
        {
            Ok(turns) => turns,
            Err(err) => {
                tracing::warn!("History lookup failed, answering without context: {}", err);
                return question.to_string();
            }
        };

        let window = ConversationWindow::new(turns);
        if window.is_empty() {
            return question.to_string();
        }

        match self.rewriter.rewrite(&window, question).await {
            Ok(rewritten) if !rewritten.trim().is_empty() => {
                tracing::info!("Rewritten query: {}", rewritten);
                rewritten
            }
            Ok(_) => question.to_string(),
            Err(err) => {
                tracing::warn!("Query rewrite failed, using raw question: {}", err);
                question.to_string()
            }
        }
    }
}
