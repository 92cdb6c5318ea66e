use std::sync::Arc;

use async_trait::async_trait;

use crate::index::ScoredChunk;
use crate::llm::{LanguageModel, LlmError};

/// Separator between chunk texts in the context block.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Builds the grounded prompt and invokes the language model once.
#[async_trait]
pub trait Compose: Send + Sync {
    async fn compose(&self, question: &str, chunks: &[ScoredChunk]) -> Result<String, LlmError>;
}

/// Production composer. Chunk order is taken as authoritative; no
/// deduplication or re-ranking happens here, and the model's response is
/// returned untouched.
pub struct GroundedComposer {
    model: Arc<dyn LanguageModel>,
    model_id: String,
}

impl GroundedComposer {
    pub fn new(model: Arc<dyn LanguageModel>, model_id: String) -> Self {
        Self { model, model_id }
    }
}

#[async_trait]
impl Compose for GroundedComposer {
    async fn compose(&self, question: &str, chunks: &[ScoredChunk]) -> Result<String, LlmError> {
        let prompt = build_answer_prompt(question, chunks);
        self.model.generate(&prompt, &self.model_id).await
    }
}

pub(crate) fn build_answer_prompt(question: &str, chunks: &[ScoredChunk]) -> String {
    let context = chunks
        .iter()
        .map(|scored| scored.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR);

    format!(
        "You are a helpful assistant for Primis Digital, a technology company.\n\n\
         Based on the following information from Primis Digital's website, answer the \
         user's question accurately and professionally.\n\n\
         CONTEXT FROM PRIMIS DIGITAL:\n{context}\n\n\
         USER QUESTION: {question}\n\n\
         INSTRUCTIONS:\n\
         - Answer based ONLY on the provided context\n\
         - Be specific and cite relevant details\n\
         - If the context doesn't contain enough information, say so politely\n\
         - Keep your answer concise and professional\n\
         - Format your answer with clear paragraphs\n\n\
         ANSWER:"
    )
}
