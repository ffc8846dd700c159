use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use service::errors::ServiceError;

/// HTTP-facing wrapper around `ServiceError`: one status code per error
/// kind, JSON error body.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub ServiceError);

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            ServiceError::UnknownProgram(_) => StatusCode::NOT_FOUND,
            ServiceError::Unauthorized => StatusCode::FORBIDDEN,
            ServiceError::InvalidValue(_) => StatusCode::BAD_REQUEST,
            ServiceError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = self.0.to_string();
        if status.is_server_error() {
            error!(error = %msg, "request failed");
        }
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}
