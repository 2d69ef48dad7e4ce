//! Error types shared by the HTTP handlers and the upstream clients.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::auth::services::IdentityError;

/// Failure talking to a hosted completion or translation API.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} API key is not configured")]
    NotConfigured(&'static str),
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Error returned by every handler; renders as `{"error": "<message>"}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection, "rejected request body");
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<IdentityError> for ApiError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::BadRequest(msg) => ApiError::BadRequest(msg.into()),
            IdentityError::InvalidPassword | IdentityError::UnknownEmail => {
                ApiError::Unauthorized(e.to_string())
            }
            IdentityError::EmailTaken => ApiError::Conflict(e.to_string()),
            IdentityError::Storage(cause) => {
                error!(error = ?cause, "identity storage failure");
                ApiError::Internal("Storage error".into())
            }
        }
    }
}
