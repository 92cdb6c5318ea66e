use serde::{Deserialize, Serialize};

use super::store::TextChunk;

/// Serialized form of the corpus, produced by the `ingest` binary and
/// consumed by the index loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexArtifact {
    /// Embedding model that produced the vectors. Verified against the
    /// query-time embedder before the index goes `Ready`.
    pub embedding_model: String,
    /// Embedding dimensionality, constant across all chunks.
    pub dimension: usize,
    pub chunks: Vec<TextChunk>,
}

impl IndexArtifact {
    pub fn new(embedding_model: String, chunks: Vec<TextChunk>) -> Self {
        let dimension = chunks.first().map(|c| c.embedding.len()).unwrap_or(0);
        Self {
            embedding_model,
            dimension,
            chunks,
        }
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
