use axum::{http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::models::{AuthError, RepositoryError, ServiceError};

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<Value>);

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(json!({
            "error": message.into(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

pub(crate) fn bad_request(message: impl Into<String>) -> ApiError {
    error_response(StatusCode::BAD_REQUEST, message)
}

/// Convert ServiceError to HTTP response
pub fn service_error_to_response(err: ServiceError) -> ApiError {
    let (status, message) = match err {
        ServiceError::ItemNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        ServiceError::FeedbackNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        ServiceError::ValidationError { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        ServiceError::Repository { source } => match source {
            RepositoryError::DuplicateKey { .. } => (StatusCode::CONFLICT, source.to_string()),
        },
    };

    error_response(status, message)
}

pub fn auth_error_to_response(err: AuthError) -> ApiError {
    let status = match err {
        AuthError::MissingToken | AuthError::InvalidToken { .. } => StatusCode::UNAUTHORIZED,
        AuthError::Forbidden => StatusCode::FORBIDDEN,
    };

    error_response(status, err.to_string())
}
