//! Application state for the passage API

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::core::services::Services;
use crate::router::CollectionRouter;

/// Shared application state for Axum handlers
///
/// All fields are wrapped in Arc for sharing across async tasks.
#[derive(Clone)]
pub struct AppState {
    /// Core services and configuration
    pub services: Arc<Services>,

    /// Active-collection router
    pub router: Arc<CollectionRouter>,

    /// Bounds concurrent indexing jobs
    pub index_permits: Arc<Semaphore>,
}

impl AppState {
    /// Create state around shared services.
    ///
    /// The router starts at the configured default collection.
    pub fn new(services: Arc<Services>) -> Self {
        let permits = services.config.limits.max_concurrent_indexes;
        let router = Arc::new(CollectionRouter::new(Arc::clone(&services)));

        Self {
            services,
            router,
            index_permits: Arc::new(Semaphore::new(permits)),
        }
    }
}
