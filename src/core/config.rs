//! Application configuration.
//!
//! Defaults, then an optional `config.toml` next to the data directory,
//! then environment variables. Secrets (API keys) come from the
//! environment only.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Generation model used for rewriting, composing and voice.
    pub generation_model: String,
    /// Embedding model identity; must match the one used at ingest time.
    pub embedding_model: String,
    /// Chunks retrieved per question.
    pub top_k: usize,
    /// Conversation turns included in the rewrite transcript.
    pub history_limit: usize,
    /// Days a turn stays eligible for context building.
    pub retention_days: i64,
    /// Timeout for every upstream HTTP call, in seconds.
    pub upstream_timeout_secs: u64,
    /// Object-storage bucket holding the index artifact.
    pub bucket_name: String,
    /// Remote path of the index artifact inside the bucket.
    pub index_object_path: String,
    /// CORS origins allowed to call the API. Empty means allow any.
    pub cors_allowed_origins: Vec<String>,

    #[serde(skip)]
    pub gemini_api_key: Option<String>,
    #[serde(skip)]
    pub supabase_url: Option<String>,
    #[serde(skip)]
    pub supabase_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generation_model: "gemini-2.0-flash".to_string(),
            embedding_model: "text-embedding-004".to_string(),
            top_k: 4,
            history_limit: 5,
            retention_days: 7,
            upstream_timeout_secs: 30,
            bucket_name: "vectorstore-bucket".to_string(),
            index_object_path: "vectorstore/index.json".to_string(),
            cors_allowed_origins: Vec::new(),
            gemini_api_key: None,
            supabase_url: None,
            supabase_key: None,
        }
    }
}

impl AppConfig {
    pub fn load(data_dir: &Path) -> Self {
        let mut config = read_config_file(&data_dir.join("config.toml")).unwrap_or_default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Ok(model) = env::var("GENERATION_MODEL") {
            self.generation_model = model;
        }
        if let Ok(model) = env::var("EMBEDDING_MODEL") {
            self.embedding_model = model;
        }
        if let Ok(bucket) = env::var("SUPABASE_BUCKET_NAME") {
            self.bucket_name = bucket;
        }
        self.gemini_api_key = env::var("GEMINI_API_KEY").ok().filter(|v| !v.is_empty());
        self.supabase_url = env::var("SUPABASE_URL").ok().filter(|v| !v.is_empty());
        self.supabase_key = env::var("SUPABASE_KEY").ok().filter(|v| !v.is_empty());
    }

    pub fn upstream_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn retention_window(&self) -> chrono::Duration {
        chrono::Duration::days(self.retention_days)
    }
}

fn read_config_file(path: &Path) -> Option<AppConfig> {
    let raw = fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&raw) {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!("Ignoring malformed {}: {}", path.display(), err);
            None
        }
    }
}
