use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use super::session_from_cookies;
use crate::core::errors::ApiError;
use crate::state::AppState;

/// Chat history for the caller's session, oldest first. Returns a bare
/// array so the frontend can slice it directly; no cookie means no
/// session, which is an empty history rather than an error.
pub async fn get_chat_history(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(_user_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(session_id) = session_from_cookies(&headers) else {
        return Ok(Json(json!([])));
    };

    let limit = history_limit(&params);
    let since = Utc::now() - state.config.retention_window();

    let turns = state
        .history
        .session_history(&session_id, since, limit)
        .await?;

    let payload: Vec<Value> = turns
        .into_iter()
        .map(|turn| {
            json!({
                "id": turn.id,
                "question": turn.question,
                "answer": turn.answer,
                "created_at": turn.created_at.to_rfc3339()
            })
        })
        .collect();

    Ok(Json(Value::Array(payload)))
}

/// Page size for the history endpoint, capped at 50. SQLite treats a
/// negative LIMIT as unlimited, so out-of-range values are clamped rather
/// than passed through.
fn history_limit(params: &HashMap<String, String>) -> i64 {
    params
        .get("limit")
        .and_then(|v| v.parse::<i64>().ok())
        .map(|v| v.clamp(1, 50))
        .unwrap_or(50)
}
