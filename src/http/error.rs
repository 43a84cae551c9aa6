//! HTTP status mapping for [`PassageError`]

use axum::{
    extract::{multipart::MultipartRejection, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::core::error::PassageError;

/// HTTP status code for an error
pub fn status_code(err: &PassageError) -> StatusCode {
    match err {
        PassageError::CollectionNotFound(_) => StatusCode::NOT_FOUND,
        PassageError::AlreadyIndexed(_) => StatusCode::CONFLICT,
        PassageError::InvalidName(_)
        | PassageError::InvalidQuery(_)
        | PassageError::InvalidRequest(_)
        | PassageError::Config(_) => StatusCode::BAD_REQUEST,
        PassageError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        PassageError::Extraction(_) | PassageError::EmptyDocument(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PassageError::UploadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        PassageError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        PassageError::Store(_)
        | PassageError::Io(_)
        | PassageError::Serde(_)
        | PassageError::Toml(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Errors render as `{"error": "<message>"}`
impl IntoResponse for PassageError {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Malformed or missing search parameters
impl From<QueryRejection> for PassageError {
    fn from(rejection: QueryRejection) -> Self {
        PassageError::InvalidQuery(rejection.body_text())
    }
}

/// Upload body that is not `multipart/form-data`
impl From<MultipartRejection> for PassageError {
    fn from(rejection: MultipartRejection) -> Self {
        PassageError::InvalidRequest(rejection.body_text())
    }
}
