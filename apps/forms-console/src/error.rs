//! Error types for the forms console API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use forms_core::{PreviewError, StoreError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Form not found: {0}")]
    FormNotFound(String),

    #[error("Version not found: {0}")]
    VersionNotFound(String),

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("No form is being edited")]
    NotEditing,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    InvalidPreview(#[from] PreviewError),

    #[error("Not authenticated")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::FormNotFound(_) => (StatusCode::NOT_FOUND, "FORM_NOT_FOUND"),
            ApiError::VersionNotFound(_) => (StatusCode::NOT_FOUND, "VERSION_NOT_FOUND"),
            ApiError::FieldNotFound(_) => (StatusCode::NOT_FOUND, "FIELD_NOT_FOUND"),
            ApiError::NotEditing => (StatusCode::CONFLICT, "NOT_EDITING"),
            ApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ApiError::InvalidPreview(_) => (StatusCode::BAD_REQUEST, "INVALID_PREFILL"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        };

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::FormNotFound(id) => ApiError::FormNotFound(id),
            StoreError::VersionNotFound(id) => ApiError::VersionNotFound(id),
            StoreError::FieldNotFound(id) => ApiError::FieldNotFound(id),
            StoreError::NotEditing => ApiError::NotEditing,
            other @ StoreError::IndexOutOfRange { .. } => ApiError::InvalidRequest(other.to_string()),
        }
    }
}
