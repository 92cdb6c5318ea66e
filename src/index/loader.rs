//! One-shot background index loading.
//!
//! Fetch the artifact from object storage (or the local cache when storage
//! is not configured), deserialize, verify the embedding model identity,
//! run one smoke-test query, then flip the handle to `Ready`. Any failure
//! flips it to `Failed` with the cause; there is no automatic retry.

use std::path::Path;

use crate::core::config::AppConfig;
use crate::core::paths::AppPaths;
use crate::index::{IndexArtifact, IndexHandle, VectorStore};
use crate::storage::ObjectStorage;

pub async fn load_index(
    handle: IndexHandle,
    config: AppConfig,
    paths: AppPaths,
    storage: Option<ObjectStorage>,
) {
    match try_load(&config, &paths, storage.as_ref()).await {
        Ok(store) => {
            tracing::info!("Vector index ready: {} chunks", store.len());
            handle.set_ready(store);
        }
        Err(reason) => {
            tracing::error!("Vector index loading failed: {}", reason);
            handle.set_failed(reason);
        }
    }
}

async fn try_load(
    config: &AppConfig,
    paths: &AppPaths,
    storage: Option<&ObjectStorage>,
) -> Result<VectorStore, String> {
    let bytes = fetch_artifact(config, paths, storage).await?;

    let artifact = IndexArtifact::from_json(&bytes)
        .map_err(|e| format!("failed to deserialize index artifact: {e}"))?;

    if artifact.embedding_model != config.embedding_model {
        return Err(format!(
            "index was built with embedding model '{}' but '{}' is configured for queries",
            artifact.embedding_model, config.embedding_model
        ));
    }

    let store = VectorStore::new(artifact.chunks)?;

    smoke_test(&store)?;
    Ok(store)
}

async fn fetch_artifact(
    config: &AppConfig,
    paths: &AppPaths,
    storage: Option<&ObjectStorage>,
) -> Result<Vec<u8>, String> {
    if let Some(storage) = storage {
        tracing::info!(
            "Downloading index artifact {}/{}",
            config.bucket_name,
            config.index_object_path
        );
        match storage
            .download(&config.bucket_name, &config.index_object_path)
            .await
        {
            Ok(bytes) => {
                tracing::info!("Downloaded index artifact: {} bytes", bytes.len());
                // Refresh the local cache so the next start can survive a
                // storage outage.
                if let Err(e) = std::fs::write(&paths.index_cache_path, &bytes) {
                    tracing::warn!("Failed to cache index artifact locally: {}", e);
                }
                return Ok(bytes);
            }
            Err(e) => {
                tracing::warn!("Index download failed ({}), trying local cache", e);
            }
        }
    }

    read_cache(&paths.index_cache_path)
}

fn read_cache(path: &Path) -> Result<Vec<u8>, String> {
    std::fs::read(path).map_err(|e| format!("no index artifact at {}: {e}", path.display()))
}

fn smoke_test(store: &VectorStore) -> Result<(), String> {
    let Some(probe) = store
        .nearest_neighbors(&vec![1.0; store.dimension().max(1)], 1)
        .into_iter()
        .next()
    else {
        // An empty corpus still serves requests; retrieval just finds
        // nothing.
        tracing::warn!("Index loaded with zero chunks");
        return Ok(());
    };

    tracing::info!(
        "Smoke-test search ok, sample content: {:.80}...",
        probe.chunk.text
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{IndexStatus, TextChunk};

    fn artifact(model: &str) -> IndexArtifact {
        IndexArtifact::new(
            model.to_string(),
            vec![TextChunk {
                id: "c1".to_string(),
                text: "We offer web design and AI consulting.".to_string(),
                source: "https://primisdigital.com/services".to_string(),
                embedding: vec![1.0, 0.0],
            }],
        )
    }

    fn test_config() -> AppConfig {
        AppConfig::default()
    }

    #[tokio::test]
    async fn loads_from_local_cache_and_goes_ready() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::for_dir(dir.path());
        std::fs::write(
            &paths.index_cache_path,
            artifact("text-embedding-004").to_json().unwrap(),
        )
        .unwrap();

        let handle = IndexHandle::new();
        load_index(handle.clone(), test_config(), paths, None).await;

        match handle.status() {
            IndexStatus::Ready(store) => assert_eq!(store.len(), 1),
            other => panic!("expected ready, got {}", other.label()),
        }
    }

    #[tokio::test]
    async fn missing_artifact_fails_the_handle() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::for_dir(dir.path());

        let handle = IndexHandle::new();
        load_index(handle.clone(), test_config(), paths, None).await;

        assert!(matches!(handle.status(), IndexStatus::Failed(_)));
    }

    #[tokio::test]
    async fn embedding_model_mismatch_fails_the_handle() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::for_dir(dir.path());
        std::fs::write(
            &paths.index_cache_path,
            artifact("all-MiniLM-L6-v2").to_json().unwrap(),
        )
        .unwrap();

        let handle = IndexHandle::new();
        load_index(handle.clone(), test_config(), paths, None).await;

        match handle.status() {
            IndexStatus::Failed(reason) => assert!(reason.contains("embedding model")),
            other => panic!("expected failed, got {}", other.label()),
        }
    }

    #[tokio::test]
    async fn corrupt_artifact_fails_the_handle() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::for_dir(dir.path());
        std::fs::write(&paths.index_cache_path, b"not json").unwrap();

        let handle = IndexHandle::new();
        load_index(handle.clone(), test_config(), paths, None).await;

        assert!(matches!(handle.status(), IndexStatus::Failed(_)));
    }
}
