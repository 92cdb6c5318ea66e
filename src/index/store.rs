use serde::{Deserialize, Serialize};

/// A fragment of source content with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextChunk {
    /// Unique chunk identifier.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// Originating document URL or name, for provenance.
    pub source: String,
    /// Fixed-length embedding vector.
    pub embedding: Vec<f32>,
}

/// A chunk paired with its similarity score for one query.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: TextChunk,
    /// Cosine similarity (higher = better).
    pub score: f32,
}

/// Immutable brute-force cosine index over the whole corpus.
///
/// Small corpora (a single website) do not justify an ANN structure; a
/// linear scan is exact and keeps ingestion order available for stable
/// tie-breaking.
#[derive(Debug)]
pub struct VectorStore {
    chunks: Vec<TextChunk>,
    dimension: usize,
}

impl VectorStore {
    /// Builds a store, rejecting chunks whose embedding dimensionality
    /// disagrees with the rest of the corpus.
    pub fn new(chunks: Vec<TextChunk>) -> Result<Self, String> {
        let dimension = chunks.first().map(|c| c.embedding.len()).unwrap_or(0);
        if let Some(bad) = chunks.iter().find(|c| c.embedding.len() != dimension) {
            return Err(format!(
                "chunk {} has embedding dimension {} (index dimension is {})",
                bad.id,
                bad.embedding.len(),
                dimension
            ));
        }
        Ok(Self { chunks, dimension })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Top-k nearest neighbours by cosine similarity, most relevant first.
    /// Ties keep ingestion order (the sort is stable over an already
    /// ingestion-ordered scan).
    pub fn nearest_neighbors(&self, query_embedding: &[f32], k: usize) -> Vec<ScoredChunk> {
        if k == 0 || self.chunks.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .map(|chunk| ScoredChunk {
                chunk: chunk.clone(),
                score: cosine_similarity(query_embedding, &chunk.embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        scored
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    let denom = norm_a * norm_b;

    if denom <= f32::EPSILON {
        0.0
    } else {
        dot / denom
    }
}
