//! Gemini REST client (`generateContent` / `embedContent`).

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::{Embedder, LanguageModel, LlmError};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    api_key: Option<String>,
    embedding_model: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        embedding_model: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LlmError::from_reqwest)?;

        Ok(Self {
            base_url: BASE_URL.to_string(),
            api_key,
            embedding_model,
            client,
        })
    }

    fn api_key(&self) -> Result<&str, LlmError> {
        self.api_key.as_deref().ok_or(LlmError::MissingApiKey)
    }

    async fn generate_content(&self, model_id: &str, parts: Value) -> Result<String, LlmError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url,
            model_id,
            self.api_key()?
        );

        let body = json!({
            "contents": [{ "parts": parts }]
        });

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(LlmError::from_reqwest)?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let message = res.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, message });
        }

        let payload: Value = res.json().await.map_err(LlmError::from_reqwest)?;
        let text = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str, model_id: &str) -> Result<String, LlmError> {
        self.generate_content(model_id, json!([{ "text": prompt }]))
            .await
    }

    async fn generate_with_audio(
        &self,
        instruction: &str,
        audio: &[u8],
        mime_type: &str,
        model_id: &str,
    ) -> Result<String, LlmError> {
        let parts = json!([
            { "text": instruction },
            { "inline_data": { "mime_type": mime_type, "data": BASE64.encode(audio) } }
        ]);
        self.generate_content(model_id, parts).await
    }
}

#[async_trait]
impl Embedder for GeminiClient {
    fn model_id(&self) -> &str {
        &self.embedding_model
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/models/{}:batchEmbedContents?key={}",
            self.base_url,
            self.embedding_model,
            self.api_key()?
        );

        let requests: Vec<Value> = inputs
            .iter()
            .map(|input| {
                json!({
                    "model": format!("models/{}", self.embedding_model),
                    "content": { "parts": [{ "text": input }] }
                })
            })
            .collect();

        let res = self
            .client
            .post(&url)
            .json(&json!({ "requests": requests }))
            .send()
            .await
            .map_err(LlmError::from_reqwest)?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let message = res.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, message });
        }

        let payload: Value = res.json().await.map_err(LlmError::from_reqwest)?;
        let mut embeddings = Vec::new();
        if let Some(data) = payload["embeddings"].as_array() {
            for item in data {
                if let Some(vals) = item["values"].as_array() {
                    let vec: Vec<f32> = vals
                        .iter()
                        .filter_map(|v| v.as_f64().map(|f| f as f32))
                        .collect();
                    embeddings.push(vec);
                }
            }
        }

        if embeddings.len() != inputs.len() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(embeddings)
    }
}
