use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{error, instrument, warn};

use crate::{
    chat::dto::{ChatRequest, ChatResponse},
    error::ApiError,
    state::AppState,
};

pub fn chat_routes() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

#[instrument(skip(state, payload))]
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(payload) = payload?;
    let message = payload.message.unwrap_or_default();
    if message.is_empty() {
        warn!("chat request without message");
        return Err(ApiError::BadRequest("No message provided".into()));
    }

    let response = state.completion.generate(&message).await.map_err(|e| {
        error!(error = %e, "completion failed");
        ApiError::Internal(e.to_string())
    })?;

    Ok(Json(ChatResponse { response }))
}
