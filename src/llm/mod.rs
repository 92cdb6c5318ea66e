//! Language-model and embedding clients.
//!
//! `LanguageModel` and `Embedder` are the seams the answer pipeline is
//! written against; `GeminiClient` is the production implementation over
//! the Gemini REST API.

mod gemini;
mod provider;

pub use gemini::GeminiClient;
pub use provider::{Embedder, LanguageModel, LlmError};
