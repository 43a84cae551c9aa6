//! HTTP REST adapter
//!
//! Depends only on core/ and the collection router.
//!
//! Provides HTTP endpoints for indexing uploaded documents,
//! searching the active collection, and collection management via
//! the Axum web framework.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;

pub use handlers::*;
pub use state::AppState;

/// Build the API router with all routes, middleware and state
pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.services.config.max_upload_bytes();

    Router::new()
        // Health check endpoint
        .route("/health", get(health_handler))
        // API v1 endpoints
        .route(
            "/v1/index",
            post(index_handler).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/v1/search", get(search_handler))
        .route("/v1/collections", get(list_collections_handler))
        .route(
            "/v1/collections/{name}/select",
            post(select_collection_handler),
        )
        .route("/v1/collections/{name}", delete(delete_collection_handler))
        // Add middleware
        .layer(axum_middleware::from_fn(middleware::log_request))
        .layer(CorsLayer::permissive())
        // Add shared state
        .with_state(state)
}
