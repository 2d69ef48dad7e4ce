use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginRequest, UserResponse},
        services::IdentityService,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(login_or_register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
}

/// `POST /api/login`: 200 for an existing account, 201 when one was created.
#[instrument(skip(identity, payload))]
pub async fn login_or_register(
    State(identity): State<IdentityService>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(payload) = payload?;
    let outcome = identity.authenticate_or_register(payload).await?;
    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(UserResponse {
            user: outcome.into_user(),
        }),
    ))
}

#[instrument(skip(identity, payload))]
pub async fn login(
    State(identity): State<IdentityService>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(payload) = payload?;
    let user = identity.authenticate(payload).await?;
    Ok(Json(UserResponse { user }))
}

#[instrument(skip(identity, payload))]
pub async fn register(
    State(identity): State<IdentityService>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(payload) = payload?;
    let user = identity.register(payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}
