use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use service::errors::ServiceError;

/// HTTP-facing error: carries the failing operation for the log and maps
/// the service taxonomy onto a status plus a `{"success": false, "message"}`
/// body. Store failures stay opaque to the caller.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct ApiError {
    operation: &'static str,
    source: ServiceError,
}

impl ApiError {
    pub fn wrap(operation: &'static str) -> impl FnOnce(ServiceError) -> ApiError {
        move |source| ApiError { operation, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.source {
            ServiceError::Validation(_) | ServiceError::Model(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let msg = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(operation = self.operation, error = %self.source, "store operation failed");
            "internal server error".to_string()
        } else {
            self.source.to_string()
        };
        (status, Json(serde_json::json!({"success": false, "message": msg}))).into_response()
    }
}
