use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use types::errors::PublishError;

/// Central error type for the Gateway application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Failed to compute schema ID: {0}")]
    SchemaUnavailable(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Misconfigured: {0}")]
    Misconfigured(String),
}

impl From<PublishError> for AppError {
    fn from(err: PublishError) -> Self {
        if err.is_client_error() {
            AppError::BadRequest(err.to_string())
        } else {
            AppError::Provider(err.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::SchemaUnavailable(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "Failed to compute schema ID",
                    "message": msg
                }),
            ),
            AppError::Provider(msg) | AppError::Misconfigured(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
        };

        (status, Json(body)).into_response()
    }
}
