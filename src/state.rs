use std::sync::Arc;

use thiserror::Error;

use crate::core::config::AppConfig;
use crate::core::paths::AppPaths;
use crate::history::HistoryStore;
use crate::index::{load_index, IndexHandle};
use crate::llm::GeminiClient;
use crate::pipeline::{AnswerPipeline, GroundedComposer, LlmQueryRewriter, VectorRetriever};
use crate::storage::ObjectStorage;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("history store initialization failed: {0}")]
    History(String),
    #[error("llm client initialization failed: {0}")]
    Llm(String),
}

/// Global application state shared across all routes and background tasks.
#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub config: AppConfig,
    pub history: HistoryStore,
    pub llm: Arc<GeminiClient>,
    pub index: IndexHandle,
    pub pipeline: Arc<AnswerPipeline>,
}

impl AppState {
    /// Wires configuration, persistence, the Gemini client and the answer
    /// pipeline. The index starts `Loading`; call `spawn_index_loader`
    /// afterwards to begin the one-shot background load.
    pub async fn initialize() -> Result<Arc<Self>, InitializationError> {
        let paths = Arc::new(AppPaths::new());
        let config = AppConfig::load(&paths.data_dir);

        if config.gemini_api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY not set; generation and embedding calls will fail");
        }

        let history = HistoryStore::new(paths.db_path.clone())
            .await
            .map_err(|e| InitializationError::History(e.to_string()))?;

        let llm = Arc::new(
            GeminiClient::new(
                config.gemini_api_key.clone(),
                config.embedding_model.clone(),
                config.upstream_timeout(),
            )
            .map_err(|e| InitializationError::Llm(e.to_string()))?,
        );

        let index = IndexHandle::new();

        let rewriter = Arc::new(LlmQueryRewriter::new(
            llm.clone(),
            config.generation_model.clone(),
        ));
        let retriever = Arc::new(VectorRetriever::new(llm.clone(), index.clone()));
        let composer = Arc::new(GroundedComposer::new(
            llm.clone(),
            config.generation_model.clone(),
        ));

        let pipeline = Arc::new(AnswerPipeline::new(
            Arc::new(history.clone()),
            rewriter,
            retriever,
            composer,
            index.clone(),
            &config,
        ));

        Ok(Arc::new(AppState {
            paths,
            config,
            history,
            llm,
            index,
            pipeline,
        }))
    }

    /// Launches the one-shot index loading task. The only side effect is a
    /// single transition of the shared handle.
    pub fn spawn_index_loader(&self) {
        let storage = self.object_storage();
        if storage.is_none() {
            tracing::warn!("Object storage not configured; loading index from local cache only");
        }

        tokio::spawn(load_index(
            self.index.clone(),
            self.config.clone(),
            self.paths.as_ref().clone(),
            storage,
        ));
        tracing::info!("Vector index loading in background");
    }

    pub fn object_storage(&self) -> Option<ObjectStorage> {
        let url = self.config.supabase_url.clone()?;
        let key = self.config.supabase_key.clone()?;
        match ObjectStorage::new(url, key, self.config.upstream_timeout()) {
            Ok(storage) => Some(storage),
            Err(e) => {
                tracing::warn!("Failed to build object storage client: {}", e);
                None
            }
        }
    }
}
