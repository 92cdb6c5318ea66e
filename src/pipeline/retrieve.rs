use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::index::{IndexHandle, ScoredChunk};
use crate::llm::{Embedder, LlmError};

#[derive(Debug, Error)]
pub enum RetrieveError {
    /// Index still loading or failed to load. Distinct from an empty
    /// result so callers can tell "not loaded yet" from "nothing matched".
    #[error("vector index is not ready")]
    IndexNotReady,
    #[error("query embedding failed: {0}")]
    Embedding(#[from] LlmError),
}

/// Nearest-neighbour lookup over the corpus for one query string.
#[async_trait]
pub trait Retrieve: Send + Sync {
    /// At most `k` chunks, most relevant first. An empty result is not an
    /// error.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>, RetrieveError>;
}

/// Embeds the query with the same model used at ingest time and scans the
/// shared index.
pub struct VectorRetriever {
    embedder: Arc<dyn Embedder>,
    index: IndexHandle,
}

impl VectorRetriever {
    pub fn new(embedder: Arc<dyn Embedder>, index: IndexHandle) -> Self {
        Self { embedder, index }
    }
}

#[async_trait]
impl Retrieve for VectorRetriever {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>, RetrieveError> {
        let store = self.index.store().ok_or(RetrieveError::IndexNotReady)?;
        let query_embedding = self.embedder.embed_one(query).await?;
        Ok(store.nearest_neighbors(&query_embedding, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{TextChunk, VectorStore};

    struct AxisEmbedder;

    #[async_trait]
    impl Embedder for AxisEmbedder {
        fn model_id(&self) -> &str {
            "stub-embedder"
        }

        async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
            // "x"-ish queries point along the first axis, everything else
            // along the second.
            Ok(inputs
                .iter()
                .map(|s| {
                    if s.contains('x') {
                        vec![1.0, 0.0]
                    } else {
                        vec![0.0, 1.0]
                    }
                })
                .collect())
        }
    }

    fn ready_index() -> IndexHandle {
        let handle = IndexHandle::new();
        let store = VectorStore::new(vec![
            TextChunk {
                id: "x1".to_string(),
                text: "x content".to_string(),
                source: "doc".to_string(),
                embedding: vec![1.0, 0.0],
            },
            TextChunk {
                id: "y1".to_string(),
                text: "y content".to_string(),
                source: "doc".to_string(),
                embedding: vec![0.0, 1.0],
            },
        ])
        .unwrap();
        handle.set_ready(store);
        handle
    }

    #[tokio::test]
    async fn search_before_ready_signals_index_not_ready() {
        let retriever = VectorRetriever::new(Arc::new(AxisEmbedder), IndexHandle::new());
        let err = retriever.search("query", 4).await.unwrap_err();
        assert!(matches!(err, RetrieveError::IndexNotReady));
    }

    #[tokio::test]
    async fn search_returns_most_similar_first() {
        let retriever = VectorRetriever::new(Arc::new(AxisEmbedder), ready_index());

        let results = retriever.search("x marks the spot", 4).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.id, "x1");

        let results = retriever.search("query", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.id, "y1");
    }

    #[tokio::test]
    async fn embedding_failure_propagates() {
        struct FailingEmbedder;

        #[async_trait]
        impl Embedder for FailingEmbedder {
            fn model_id(&self) -> &str {
                "failing"
            }

            async fn embed(&self, _: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
                Err(LlmError::Timeout)
            }
        }

        let retriever = VectorRetriever::new(Arc::new(FailingEmbedder), ready_index());
        let err = retriever.search("query", 4).await.unwrap_err();
        assert!(matches!(err, RetrieveError::Embedding(LlmError::Timeout)));
    }
}
