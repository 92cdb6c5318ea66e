//! Corpus builder: scraped pages JSON -> chunked, embedded index artifact.
//!
//! Usage: `ingest [scraped_data.json]`. Writes the artifact to the local
//! index cache and uploads it to object storage when configured.

use std::env;
use std::sync::Arc;

use anyhow::Context;

use primis_backend::core::config::AppConfig;
use primis_backend::core::paths::AppPaths;
use primis_backend::ingest::{build_artifact, ChunkerConfig, ScrapedPage};
use primis_backend::llm::GeminiClient;
use primis_backend::storage::ObjectStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let paths = AppPaths::new();
    let config = AppConfig::load(&paths.data_dir);

    let input = env::args()
        .nth(1)
        .unwrap_or_else(|| "data/scraped_data.json".to_string());

    let raw = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read scraped pages from {}", input))?;
    let pages: Vec<ScrapedPage> =
        serde_json::from_str(&raw).context("Malformed scraped pages JSON")?;
    tracing::info!("Loaded {} scraped pages", pages.len());

    let embedder = Arc::new(GeminiClient::new(
        config.gemini_api_key.clone(),
        config.embedding_model.clone(),
        config.upstream_timeout(),
    )?);

    let artifact = build_artifact(&pages, embedder.as_ref(), &ChunkerConfig::default())
        .await
        .context("Failed to build index artifact")?;
    tracing::info!(
        "Built artifact: {} chunks, dimension {}",
        artifact.chunks.len(),
        artifact.dimension
    );

    let bytes = artifact.to_json().context("Failed to serialize artifact")?;
    std::fs::write(&paths.index_cache_path, &bytes).with_context(|| {
        format!(
            "Failed to write artifact to {}",
            paths.index_cache_path.display()
        )
    })?;
    tracing::info!("Wrote artifact to {}", paths.index_cache_path.display());

    match (config.supabase_url.clone(), config.supabase_key.clone()) {
        (Some(url), Some(key)) => {
            let storage = ObjectStorage::new(url, key, config.upstream_timeout())?;
            storage
                .upload(&config.bucket_name, &config.index_object_path, bytes)
                .await
                .context("Failed to upload artifact")?;
            tracing::info!(
                "Uploaded artifact to {}/{}",
                config.bucket_name,
                config.index_object_path
            );
        }
        _ => {
            tracing::warn!("Object storage not configured; skipping upload");
        }
    }

    Ok(())
}
