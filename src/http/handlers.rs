//! HTTP request handlers for the passage API
//!
//! Handlers are thin: they validate the request, hop onto the
//! blocking pool for store work, and shape the JSON body.

use std::time::Duration;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::QueryRejection,
        Multipart, Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::core::error::{PassageError, Result};
use crate::core::search::validate_query;
use crate::core::types::*;
use crate::http::state::AppState;

/// Health check handler
///
/// Returns server status and version information.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// A document received through the `file` multipart field
struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

fn multipart_error(err: MultipartError) -> PassageError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        PassageError::UploadTooLarge(err.body_text())
    } else {
        PassageError::InvalidRequest(err.body_text())
    }
}

/// Index document handler
///
/// Accepts a multipart upload with a required `file` field and an
/// optional `name` field. The collection name defaults to the
/// uploaded filename. Either outcome makes the collection active.
///
/// # Errors
///
/// - `InvalidRequest`: Body is not multipart, or has no `file` field
/// - `InvalidName`: Name sanitizes to nothing
/// - `UnsupportedFormat` / `Extraction` / `EmptyDocument`: Unusable document
/// - `Timeout`: Indexing exceeded `limits.request_timeout_sec`
pub async fn index_handler(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>> {
    let mut multipart = multipart?;
    let mut upload = None;
    let mut name = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                upload = Some(Upload {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            Some("name") => {
                let text = field.text().await.map_err(multipart_error)?;
                if !text.trim().is_empty() {
                    name = Some(text);
                }
            }
            other => tracing::debug!("Ignoring multipart field {:?}", other),
        }
    }

    let upload = upload
        .ok_or_else(|| PassageError::InvalidRequest("missing 'file' field".to_string()))?;
    let name = name.unwrap_or_else(|| upload.filename.clone());

    let permit = state
        .index_permits
        .clone()
        .acquire_owned()
        .await
        .map_err(|e| PassageError::Store(e.to_string()))?;

    let router = state.router.clone();
    let task = tokio::task::spawn_blocking(move || {
        // Held until the work finishes, even if the caller gave up
        let _permit = permit;
        router.index(&name, &upload.filename, &upload.bytes)
    });

    let timeout_sec = state.services.config.limits.request_timeout_sec;
    let outcome = tokio::time::timeout(Duration::from_secs(timeout_sec), task)
        .await
        .map_err(|_| PassageError::Timeout(format!("indexing exceeded {timeout_sec}s")))?
        .map_err(|e| PassageError::Store(format!("indexing task failed: {e}")))??;

    Ok(Json(MessageResponse {
        message: outcome.message().to_string(),
    }))
}

/// Search handler
///
/// Searches the active collection. A missing active collection
/// yields an empty result.
///
/// # Errors
///
/// - `InvalidQuery`: Parameters missing or malformed, or the query is
///   blank or longer than `search.max_query_length`
pub async fn search_handler(
    State(state): State<AppState>,
    params: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<ResultResponse>> {
    let Query(params) = params?;
    validate_query(
        &params.query,
        state.services.config.search.max_query_length,
    )?;

    let router = state.router.clone();
    let response = tokio::task::spawn_blocking(move || router.search(&params.query, params.k))
        .await
        .map_err(|e| PassageError::Store(format!("search task failed: {e}")))??;

    Ok(Json(ResultResponse {
        result: response.passages,
    }))
}

/// List collections handler
pub async fn list_collections_handler(
    State(state): State<AppState>,
) -> Result<Json<CollectionsResponse>> {
    let router = state.router.clone();
    let response = tokio::task::spawn_blocking(move || router.list())
        .await
        .map_err(|e| PassageError::Store(format!("list task failed: {e}")))??;

    Ok(Json(response))
}

/// Select collection handler
///
/// # Errors
///
/// - `CollectionNotFound`: Collection doesn't exist
pub async fn select_collection_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>> {
    let router = state.router.clone();
    let collection = tokio::task::spawn_blocking(move || router.select(&name))
        .await
        .map_err(|e| PassageError::Store(format!("select task failed: {e}")))??;

    Ok(Json(MessageResponse {
        message: format!("Selected collection {collection}"),
    }))
}

/// Delete collection handler
///
/// Removes a collection. The active collection resets to the default.
///
/// # Errors
///
/// - `CollectionNotFound`: Collection doesn't exist
pub async fn delete_collection_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>> {
    let router = state.router.clone();
    let deleted = tokio::task::spawn_blocking(move || router.delete(&name))
        .await
        .map_err(|e| PassageError::Store(format!("delete task failed: {e}")))??;

    Ok(Json(MessageResponse {
        message: format!("Deleted collection {deleted}"),
    }))
}
