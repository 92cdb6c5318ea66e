//! In-process vector index.
//!
//! The corpus is built offline by the `ingest` binary, serialized as a JSON
//! artifact, and loaded once at startup by a background task. Requests read
//! the index through `IndexHandle`, which exposes the loading state machine
//! (`Loading -> Ready | Failed`).

mod artifact;
mod handle;
mod loader;
mod store;

pub use artifact::IndexArtifact;
pub use handle::{IndexHandle, IndexStatus};
pub use loader::load_index;
pub use store::{ScoredChunk, TextChunk, VectorStore};
