use std::sync::Arc;

use async_trait::async_trait;

use super::window::ConversationWindow;
use crate::llm::{LanguageModel, LlmError};

/// Turns a follow-up question into a standalone one, given recent
/// conversation. Callers must skip this entirely when the window is empty.
#[async_trait]
pub trait Rewrite: Send + Sync {
    async fn rewrite(
        &self,
        window: &ConversationWindow,
        question: &str,
    ) -> Result<String, LlmError>;
}

/// Production rewriter: one synchronous LLM call, no retry. Failures
/// propagate; the pipeline owns the fallback to the raw question.
pub struct LlmQueryRewriter {
    model: Arc<dyn LanguageModel>,
    model_id: String,
}

impl LlmQueryRewriter {
    pub fn new(model: Arc<dyn LanguageModel>, model_id: String) -> Self {
        Self { model, model_id }
    }
}

#[async_trait]
impl Rewrite for LlmQueryRewriter {
    async fn rewrite(
        &self,
        window: &ConversationWindow,
        question: &str,
    ) -> Result<String, LlmError> {
        let prompt = build_rewrite_prompt(window, question);
        let response = self.model.generate(&prompt, &self.model_id).await?;
        Ok(response.trim().to_string())
    }
}

fn build_rewrite_prompt(window: &ConversationWindow, question: &str) -> String {
    format!(
        "You are a query rewriter.\n\n\
         Given the conversation below and a follow-up question,\n\
         rewrite the question so it can be understood independently.\n\n\
         Conversation:\n{}\n\
         Follow-up question:\n{}\n\n\
         Rewrite the question clearly:",
        window.transcript(),
        question
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::ChatTurn;
    use chrono::Utc;
    use std::sync::Mutex;

    struct RecordingModel {
        prompts: Mutex<Vec<String>>,
        reply: String,
    }

    #[async_trait]
    impl LanguageModel for RecordingModel {
        fn name(&self) -> &str {
            "stub"
        }

        async fn generate(&self, prompt: &str, _model_id: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }

        async fn generate_with_audio(
            &self,
            _instruction: &str,
            _audio: &[u8],
            _mime_type: &str,
            _model_id: &str,
        ) -> Result<String, LlmError> {
            unreachable!("not used by the rewriter")
        }
    }

    fn window() -> ConversationWindow {
        ConversationWindow::new(vec![ChatTurn {
            id: 1,
            session_id: "s1".to_string(),
            user_id: "u1".to_string(),
            question: "What are your pricing tiers?".to_string(),
            answer: "We offer three tiers.".to_string(),
            created_at: Utc::now(),
        }])
    }

    #[tokio::test]
    async fn prompt_contains_transcript_and_question() {
        let model = Arc::new(RecordingModel {
            prompts: Mutex::new(Vec::new()),
            reply: "  What support options does Primis Digital provide?  ".to_string(),
        });
        let rewriter = LlmQueryRewriter::new(model.clone(), "gemini-2.0-flash".to_string());

        let rewritten = rewriter
            .rewrite(&window(), "and what about support?")
            .await
            .unwrap();

        // Response is trimmed.
        assert_eq!(rewritten, "What support options does Primis Digital provide?");

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("User: What are your pricing tiers?"));
        assert!(prompts[0].contains("Assistant: We offer three tiers."));
        assert!(prompts[0].contains("and what about support?"));
    }

    #[tokio::test]
    async fn model_failure_propagates() {
        struct FailingModel;

        #[async_trait]
        impl LanguageModel for FailingModel {
            fn name(&self) -> &str {
                "failing"
            }

            async fn generate(&self, _: &str, _: &str) -> Result<String, LlmError> {
                Err(LlmError::Timeout)
            }

            async fn generate_with_audio(
                &self,
                _: &str,
                _: &[u8],
                _: &str,
                _: &str,
            ) -> Result<String, LlmError> {
                unreachable!()
            }
        }

        let rewriter = LlmQueryRewriter::new(Arc::new(FailingModel), "m".to_string());
        let err = rewriter.rewrite(&window(), "anything").await.unwrap_err();
        assert!(matches!(err, LlmError::Timeout));
    }
}
