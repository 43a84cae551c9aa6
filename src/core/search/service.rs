//! Passage search over a collection.
//!
//! This module provides the SearchService, which turns a query into
//! reconstructed passages: similarity hits are widened by the
//! configured window, their text is fetched, and contiguous ids are
//! merged back into multi-sentence excerpts.

use crate::core::error::{PassageError, Result};
use crate::core::search::{merge_runs, Window};
use crate::core::storage::VectorStore;
use crate::core::types::{ChunkId, Collection, SearchResponse, SENTENCE_DELIMITER};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

/// Reject queries an adapter should not pass on: blank, or longer
/// than `max_len` characters.
pub fn validate_query(query: &str, max_len: usize) -> Result<()> {
    if query.trim().is_empty() {
        return Err(PassageError::InvalidQuery(
            "Query cannot be empty".to_string(),
        ));
    }
    if query.chars().count() > max_len {
        return Err(PassageError::InvalidQuery(format!(
            "Query longer than {max_len} characters"
        )));
    }
    Ok(())
}

/// Windowed passage search
pub struct SearchService {
    store: Arc<dyn VectorStore>,
    window: Window,
    default_k: usize,
    max_k: usize,
}

impl SearchService {
    /// Create a new search service
    pub fn new(store: Arc<dyn VectorStore>, window: Window, default_k: usize, max_k: usize) -> Self {
        Self {
            store,
            window,
            default_k,
            max_k,
        }
    }

    /// Window applied around every hit
    pub fn window(&self) -> Window {
        self.window
    }

    /// Effective per-sub-query hit count for a caller-supplied `k`
    pub fn effective_k(&self, k: Option<usize>) -> usize {
        k.unwrap_or(self.default_k).clamp(1, self.max_k.max(1))
    }

    /// Search `collection` and return passages in document order.
    ///
    /// The query is split on the sentence delimiter; each non-blank
    /// part is one similarity query for up to `k` ids. A query with no
    /// usable part yields an empty response.
    pub fn search(
        &self,
        collection: &Collection,
        query: &str,
        k: Option<usize>,
    ) -> Result<SearchResponse> {
        let start = Instant::now();

        let sub_queries: Vec<&str> = query
            .split(SENTENCE_DELIMITER)
            .filter(|part| !part.trim().is_empty())
            .collect();
        if sub_queries.is_empty() {
            return Ok(SearchResponse::empty(query, collection.name()));
        }

        let top_k = self.effective_k(k);
        let hits: BTreeSet<ChunkId> = self
            .store
            .query(collection, &sub_queries, top_k)?
            .into_iter()
            .flatten()
            .collect();

        let expanded = self.window.expand(hits.iter().copied());
        let fetched = self.store.fetch(collection, &expanded)?;
        let passages = merge_runs(&fetched);

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            "Search '{}': {} sub-queries, {} hits, {} expanded, {} fetched, {} passages in {}ms",
            collection,
            sub_queries.len(),
            hits.len(),
            expanded.len(),
            fetched.len(),
            passages.len(),
            duration_ms
        );

        Ok(SearchResponse {
            query: query.to_string(),
            collection: collection.name().to_string(),
            passages,
            hits: hits.len(),
            expanded: expanded.len(),
            duration_ms,
        })
    }
}
