//! Object-storage client for index artifacts (Supabase Storage REST API).

use std::time::Duration;

use reqwest::Client;

use crate::llm::LlmError;

#[derive(Clone)]
pub struct ObjectStorage {
    base_url: String,
    api_key: String,
    client: Client,
}

impl ObjectStorage {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LlmError::from_reqwest)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    pub async fn download(&self, bucket: &str, path: &str) -> Result<Vec<u8>, LlmError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, path);

        let res = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(LlmError::from_reqwest)?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let message = res.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, message });
        }

        let bytes = res.bytes().await.map_err(LlmError::from_reqwest)?;
        Ok(bytes.to_vec())
    }

    pub async fn upload(&self, bucket: &str, path: &str, content: Vec<u8>) -> Result<(), LlmError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, path);

        let res = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("x-upsert", "true")
            .header("content-type", "application/octet-stream")
            .body(content)
            .send()
            .await
            .map_err(LlmError::from_reqwest)?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let message = res.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, message });
        }

        Ok(())
    }
}
