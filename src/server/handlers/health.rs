use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

pub async fn health(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let index_status = state.index.status();
    let chunk_count = state.index.store().map(|s| s.len()).unwrap_or(0);
    // A broken history db is a real failure, not an empty store.
    let total_messages = state.history.total_message_count().await?;

    Ok(Json(json!({
        "index": index_status.label(),
        "chunks": chunk_count,
        "total_messages": total_messages,
    })))
}
