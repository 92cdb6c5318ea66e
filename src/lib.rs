//! Retrieval-augmented chat backend for the Primis Digital website.
//!
//! Website text is chunked and embedded offline (`ingest` binary), stored
//! as an index artifact, and loaded once at startup. Questions flow
//! through the answer pipeline: conversation-aware query rewriting, vector
//! search, grounded generation.

pub mod core;
pub mod history;
pub mod index;
pub mod ingest;
pub mod llm;
pub mod pipeline;
pub mod server;
pub mod state;
pub mod storage;
