//! Active-collection routing.
//!
//! The core pipelines always take an explicit [`Collection`] handle.
//! This layer remembers which collection is "currently selected" for
//! callers that do not name one. The pointer is advisory: concurrent
//! writers race with last-writer-wins, and the store stays the source
//! of truth for what exists.

use crate::core::error::{PassageError, Result};
use crate::core::naming::sanitize;
use crate::core::services::Services;
use crate::core::types::{Collection, CollectionsResponse, IndexOutcome, SearchResponse};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Maps "the selected collection" onto collection handles
pub struct CollectionRouter {
    services: Arc<Services>,
    default_name: String,
    active: RwLock<String>,
    /// Where the selection survives between processes (CLI only)
    state_file: Option<PathBuf>,
}

impl CollectionRouter {
    /// Router starting at the configured default collection
    pub fn new(services: Arc<Services>) -> Self {
        let default_name = services.config.storage.default_collection.clone();
        Self {
            services,
            active: RwLock::new(default_name.clone()),
            default_name,
            state_file: None,
        }
    }

    /// Router whose selection is read from and written to `path`
    pub fn with_state_file(services: Arc<Services>, path: PathBuf) -> Self {
        let mut router = Self::new(services);
        if let Ok(saved) = fs::read_to_string(&path) {
            let saved = saved.trim();
            match sanitize(saved) {
                Ok(name) if name == saved => router.active = RwLock::new(name),
                _ => tracing::warn!("Ignoring invalid saved collection {:?} in {:?}", saved, path),
            }
        }
        router.state_file = Some(path);
        router
    }

    /// Name searches fall back to after a delete
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Currently selected collection name
    pub fn active(&self) -> String {
        match self.active.read() {
            Ok(name) => name.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_active(&self, name: &str) {
        match self.active.write() {
            Ok(mut active) => *active = name.to_string(),
            Err(poisoned) => *poisoned.into_inner() = name.to_string(),
        }

        if let Some(path) = &self.state_file {
            let written = path
                .parent()
                .map_or(Ok(()), fs::create_dir_all)
                .and_then(|()| fs::write(path, name));
            if let Err(e) = written {
                tracing::warn!("Failed to persist active collection to {:?}: {}", path, e);
            }
        }
    }

    /// Make sure the default collection exists
    pub fn ensure_default(&self) -> Result<Collection> {
        match self.services.store.create(&self.default_name, None) {
            Ok(collection) => {
                tracing::info!("Created default collection '{}'", self.default_name);
                Ok(collection)
            }
            Err(PassageError::AlreadyIndexed(_)) => self.services.store.get(&self.default_name),
            Err(e) => Err(e),
        }
    }

    /// Index a document and select the resulting collection.
    ///
    /// Both a fresh index and an already-indexed name become active.
    pub fn index(&self, name: &str, filename: &str, bytes: &[u8]) -> Result<IndexOutcome> {
        let outcome = self.services.indexer.index(name, filename, bytes)?;
        self.set_active(outcome.collection().name());
        Ok(outcome)
    }

    /// Search the selected collection. A missing collection yields an
    /// empty response rather than an error.
    pub fn search(&self, query: &str, k: Option<usize>) -> Result<SearchResponse> {
        let name = self.active();
        match self.services.store.get(&name) {
            Ok(collection) => self.services.search.search(&collection, query, k),
            Err(e) if e.is_not_found() => {
                tracing::debug!("Active collection '{}' does not exist", name);
                Ok(SearchResponse::empty(query, &name))
            }
            Err(e) => Err(e),
        }
    }

    /// Search a named collection without changing the selection.
    /// Unlike [`search`](Self::search), an unknown name is an error.
    pub fn search_in(&self, name: &str, query: &str, k: Option<usize>) -> Result<SearchResponse> {
        let collection = self.services.store.get(&sanitize(name)?)?;
        self.services.search.search(&collection, query, k)
    }

    /// Select an existing collection
    pub fn select(&self, name: &str) -> Result<Collection> {
        let collection = self.services.store.get(&sanitize(name)?)?;
        self.set_active(collection.name());
        tracing::info!("Selected collection '{}'", collection);
        Ok(collection)
    }

    /// Delete a collection and reset the selection to the default
    pub fn delete(&self, name: &str) -> Result<String> {
        let name = sanitize(name)?;
        self.services.store.delete(&name)?;
        self.set_active(&self.default_name);
        tracing::info!(
            "Deleted collection '{}', active collection reset to '{}'",
            name,
            self.default_name
        );
        Ok(name)
    }

    /// All collections plus the current selection
    pub fn list(&self) -> Result<CollectionsResponse> {
        Ok(CollectionsResponse {
            collections: self.services.store.list()?,
            active: self.active(),
        })
    }
}
