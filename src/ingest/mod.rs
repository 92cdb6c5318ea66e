//! Offline corpus construction: scraped pages -> chunks -> embeddings ->
//! index artifact. Crawling itself happens elsewhere; this module starts
//! from its JSON output.

mod chunker;

use serde::{Deserialize, Serialize};

use crate::index::{IndexArtifact, TextChunk};
use crate::llm::{Embedder, LlmError};

pub use chunker::{split_into_chunks, ChunkerConfig};

/// Embedding requests are batched to keep request bodies bounded.
const EMBED_BATCH_SIZE: usize = 32;

/// One page as produced by the scraper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedPage {
    pub url: String,
    pub title: String,
    pub content: String,
}

/// Chunks every page, keeping the page URL as the chunk source.
pub fn chunk_pages(pages: &[ScrapedPage], config: &ChunkerConfig) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for page in pages {
        let page_text = format!("{}\n\n{}", page.title, page.content);
        for chunk in split_into_chunks(&page_text, config) {
            out.push((chunk, page.url.clone()));
        }
    }
    out
}

/// Builds the full index artifact: chunk, embed in batches, assemble.
pub async fn build_artifact(
    pages: &[ScrapedPage],
    embedder: &dyn Embedder,
    config: &ChunkerConfig,
) -> Result<IndexArtifact, LlmError> {
    let chunked = chunk_pages(pages, config);
    tracing::info!("Chunked {} pages into {} chunks", pages.len(), chunked.len());

    let mut chunks = Vec::with_capacity(chunked.len());
    for batch in chunked.chunks(EMBED_BATCH_SIZE) {
        let texts: Vec<String> = batch.iter().map(|(text, _)| text.clone()).collect();
        let embeddings = embedder.embed(&texts).await?;

        for ((text, source), embedding) in batch.iter().zip(embeddings) {
            chunks.push(TextChunk {
                id: format!("chunk-{}", chunks.len()),
                text: text.clone(),
                source: source.clone(),
                embedding,
            });
        }
    }

    Ok(IndexArtifact::new(embedder.model_id().to_string(), chunks))
}
