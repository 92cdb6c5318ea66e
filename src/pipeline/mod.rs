//! The retrieval-augmented answer pipeline.
//!
//! `AnswerPipeline` orchestrates query rewriting, vector search and
//! grounded generation for one question. Each stage sits behind a trait so
//! the pipeline can be exercised with deterministic stubs.

mod answer;
mod compose;
mod retrieve;
mod rewrite;
mod window;

use thiserror::Error;

use crate::llm::LlmError;

pub use answer::AnswerPipeline;
pub use compose::{Compose, GroundedComposer, CONTEXT_SEPARATOR};
pub use retrieve::{Retrieve, RetrieveError, VectorRetriever};
pub use rewrite::{LlmQueryRewriter, Rewrite};
pub use window::{ConversationHistory, ConversationWindow};

/// Fixed reply when retrieval finds nothing. A business outcome, not an
/// error.
pub const NO_RELEVANT_CONTENT_MESSAGE: &str = "I couldn't find relevant information in the \
     Primis Digital knowledge base. Could you rephrase your question?";

/// Fixed reply while the index is still loading or failed to load.
pub const NOT_READY_MESSAGE: &str =
    "The knowledge base is still loading. Please try again shortly.";

/// What one `answer()` call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// A grounded answer from the language model.
    Answer(String),
    /// Index not `Ready`; retrieval was never attempted.
    NotReady,
    /// Retrieval ran and matched nothing.
    NoRelevantContent,
}

impl AnswerOutcome {
    /// The user-visible message for this outcome.
    pub fn message(&self) -> &str {
        match self {
            AnswerOutcome::Answer(text) => text,
            AnswerOutcome::NotReady => NOT_READY_MESSAGE,
            AnswerOutcome::NoRelevantContent => NO_RELEVANT_CONTENT_MESSAGE,
        }
    }

    pub fn into_message(self) -> String {
        match self {
            AnswerOutcome::Answer(text) => text,
            other => other.message().to_string(),
        }
    }
}

/// Failures with no safe in-pipeline fallback. Rewrite failures never show
/// up here; they are absorbed by falling back to the raw question.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("retrieval failed: {0}")]
    Retrieval(#[source] LlmError),
    #[error("answer generation failed: {0}")]
    Generation(#[source] LlmError),
    #[error("upstream call timed out during {0}")]
    UpstreamTimeout(&'static str),
}
