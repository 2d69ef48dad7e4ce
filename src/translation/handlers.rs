use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{error, instrument, warn};

use crate::{
    error::ApiError,
    state::AppState,
    translation::dto::{TranslateRequest, TranslateResponse},
};

pub fn translation_routes() -> Router<AppState> {
    Router::new().route("/translate", post(translate))
}

#[instrument(skip(state, payload))]
pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let Json(payload) = payload?;
    let target = payload.target().to_owned();
    let texts = match payload.text {
        Some(text) if !text.is_empty() => text.into_vec(),
        _ => {
            warn!("translate request without text");
            return Err(ApiError::BadRequest("No text provided".into()));
        }
    };

    let translated_text = state
        .translator
        .translate(&texts, &target)
        .await
        .map_err(|e| {
            error!(error = %e, target = %target, "translation failed");
            ApiError::Internal("Translation API failed".into())
        })?;

    Ok(Json(TranslateResponse { translated_text }))
}
