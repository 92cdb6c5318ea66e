use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{session_cookie_header, session_from_cookies};
use crate::core::errors::ApiError;
use crate::state::AppState;

fn default_user_id() -> String {
    "default_user".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    pub text: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

/// Main chat endpoint. Runs the answer pipeline, persists the resulting
/// turn, and returns `{message, session_id, status}`. A session cookie is
/// minted when the request has none.
pub async fn chat_main(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<ChatForm>,
) -> Result<Response, ApiError> {
    let question = form.text.trim();
    if question.is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".to_string()));
    }

    let existing_session = session_from_cookies(&headers);
    let session_id = existing_session
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let outcome = state.pipeline.answer(question, Some(&session_id)).await?;
    let message = outcome.into_message();

    // Persistence is a side effect of the transport layer, not of the
    // pipeline itself.
    state
        .history
        .append(&session_id, &form.user_id, question, &message)
        .await?;

    let mut response = Json(json!({
        "message": message,
        "session_id": session_id,
        "status": "success"
    }))
    .into_response();

    if existing_session.is_none() {
        if let Ok(value) = HeaderValue::from_str(&session_cookie_header(&session_id)) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
    }

    Ok(response)
}
