use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GEMINI_API_KEY not configured")]
    MissingApiKey,
    #[error("upstream request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("model returned an empty response")]
    EmptyResponse,
}

impl LlmError {
    /// Collapses reqwest timeouts into the distinct `Timeout` kind so
    /// callers can tell capacity issues from hard failures.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Http(err)
        }
    }
}

/// Stateless text-generation backend. Single-shot, non-streaming.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// return the provider name (e.g. "gemini")
    fn name(&self) -> &str;

    /// generate a completion for a single prompt
    async fn generate(&self, prompt: &str, model_id: &str) -> Result<String, LlmError>;

    /// generate from an instruction plus an inline audio part
    async fn generate_with_audio(
        &self,
        instruction: &str,
        audio: &[u8],
        mime_type: &str,
        model_id: &str,
    ) -> Result<String, LlmError>;
}

/// Text embedding backend.
///
/// The model identity must be the same at corpus-build time and query time,
/// or similarity scores are meaningless; `model_id` exists so the index
/// loader can verify that.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn model_id(&self) -> &str;

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmError>;

    async fn embed_one(&self, input: &str) -> Result<Vec<f32>, LlmError> {
        let mut vectors = self.embed(&[input.to_string()]).await?;
        if vectors.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(vectors.swap_remove(0))
    }
}
