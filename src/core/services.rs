//! Unified service container for passage
//!
//! Provides shared access to all core services.

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::indexer::{Chunker, DocumentExtractor, IndexingPipeline};
use crate::core::search::{SearchService, Window};
use crate::core::storage::{open_store, VectorStore};
use std::sync::Arc;

/// Unified services container
///
/// All adapters use this same struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Collection store shared by indexing and search
    pub store: Arc<dyn VectorStore>,

    /// Windowed passage search
    pub search: Arc<SearchService>,

    /// Document indexing pipeline
    pub indexer: Arc<IndexingPipeline>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration, opening the configured store
    pub fn new(config: Config) -> Result<Self> {
        let store = open_store(&config.storage)?;
        Ok(Self::with_store(config, store))
    }

    /// Create services around an existing store
    pub fn with_store(config: Config, store: Arc<dyn VectorStore>) -> Self {
        let window = Window::new(config.search.window_before, config.search.window_after);
        let search = Arc::new(SearchService::new(
            Arc::clone(&store),
            window,
            config.search.default_k,
            config.search.max_k,
        ));

        let indexer = Arc::new(IndexingPipeline::new(
            Arc::clone(&store),
            Arc::new(DocumentExtractor::new(config.extraction.clone())),
            Chunker::new(
                config.indexing.min_chunk_len,
                config.indexing.min_document_chars,
            ),
        ));

        Self {
            store,
            search,
            indexer,
            config: Arc::new(config),
        }
    }
}
