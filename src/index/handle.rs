use std::sync::{Arc, RwLock};

use super::store::VectorStore;

/// Lifecycle of the shared index. `Ready` and `Failed` are terminal; there
/// is no hot-reload.
#[derive(Clone)]
pub enum IndexStatus {
    Loading,
    Ready(Arc<VectorStore>),
    Failed(String),
}

impl IndexStatus {
    pub fn label(&self) -> &'static str {
        match self {
            IndexStatus::Loading => "loading",
            IndexStatus::Ready(_) => "ready",
            IndexStatus::Failed(_) => "failed",
        }
    }
}

/// Process-wide handle to the vector index.
///
/// Single writer (the loader task), many readers. Readers always observe a
/// whole state, never a half-initialized index: the store is fully built
/// before the status swap.
#[derive(Clone)]
pub struct IndexHandle {
    inner: Arc<RwLock<IndexStatus>>,
}

impl IndexHandle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(IndexStatus::Loading)),
        }
    }

    pub fn status(&self) -> IndexStatus {
        self.inner
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// The store, if the index is `Ready`.
    pub fn store(&self) -> Option<Arc<VectorStore>> {
        match self.status() {
            IndexStatus::Ready(store) => Some(store),
            _ => None,
        }
    }

    pub fn set_ready(&self, store: VectorStore) {
        self.set(IndexStatus::Ready(Arc::new(store)));
    }

    pub fn set_failed(&self, reason: impl Into<String>) {
        self.set(IndexStatus::Failed(reason.into()));
    }

    fn set(&self, status: IndexStatus) {
        match self.inner.write() {
            Ok(mut guard) => *guard = status,
            Err(poisoned) => *poisoned.into_inner() = status,
        }
    }
}

impl Default for IndexHandle {
    fn default() -> Self {
        Self::new()
    }
}
