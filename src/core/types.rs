//! Core data types for the passage service.
//!
//! This module defines the data structures shared by the indexer,
//! the search pipeline, the stores and the adapters: chunks,
//! collection handles, indexing outcomes and response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position of a chunk in its source document.
///
/// Ids are dense and start at 0, so the id doubles as document order.
pub type ChunkId = u64;

/// Delimiter documents are split on, and passages are re-joined with.
pub const SENTENCE_DELIMITER: char = '.';

/// A single sentence-level chunk of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position in the post-filter chunk sequence
    pub id: ChunkId,

    /// Sentence text, without the delimiter
    pub text: String,
}

/// Handle to an existing collection.
///
/// Handles are issued by a store's `create` or `get`, and every
/// index or search call takes one explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Collection {
    name: String,
}

impl Collection {
    /// Wrap an already-sanitized collection name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Collection identifier
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Collection metadata as reported by `list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionInfo {
    /// Sanitized collection identifier
    pub name: String,

    /// Number of stored chunks
    pub chunks: usize,

    /// Original filename of the indexed document, if any
    pub source: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// On-disk footprint (0 for in-memory stores)
    pub size_bytes: u64,
}

/// Statistics from an indexing operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    /// Collection the document was stored in
    pub collection: String,

    /// Number of chunks written
    pub chunks_created: usize,

    /// Characters of text recovered by extraction
    pub chars_extracted: usize,

    /// Indexing duration in milliseconds
    pub duration_ms: u64,
}

/// Result of indexing a document
#[derive(Debug, Clone)]
pub enum IndexOutcome {
    /// A new collection was created and populated
    Created {
        collection: Collection,
        stats: IndexStats,
    },

    /// A collection with the sanitized name already existed; nothing changed
    AlreadyIndexed { collection: Collection },
}

impl IndexOutcome {
    /// The collection the outcome refers to
    pub fn collection(&self) -> &Collection {
        match self {
            IndexOutcome::Created { collection, .. } => collection,
            IndexOutcome::AlreadyIndexed { collection } => collection,
        }
    }

    /// Human-readable status message, as returned by the HTTP surface
    pub fn message(&self) -> &'static str {
        match self {
            IndexOutcome::Created { .. } => "Document indexed",
            IndexOutcome::AlreadyIndexed { .. } => "Already indexed",
        }
    }
}

/// Response from a search operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Original query string
    pub query: String,

    /// Collection that was searched
    pub collection: String,

    /// Reconstructed passages in document order
    pub passages: Vec<String>,

    /// Distinct chunk ids returned by the similarity queries
    pub hits: usize,

    /// Chunk ids requested after window expansion
    pub expanded: usize,

    /// Query duration in milliseconds
    pub duration_ms: u64,
}

impl SearchResponse {
    /// Response for a query that had nothing to search
    pub fn empty(query: &str, collection: &str) -> Self {
        Self {
            query: query.to_string(),
            collection: collection.to_string(),
            passages: Vec::new(),
            hits: 0,
            expanded: 0,
            duration_ms: 0,
        }
    }
}

/// `{message}` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `{result}` response body carrying passages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultResponse {
    pub result: Vec<String>,
}

/// Response from listing collections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionsResponse {
    /// Metadata for every stored collection
    pub collections: Vec<CollectionInfo>,

    /// Name searches are currently routed to
    pub active: String,
}

/// Query-string parameters of a search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Query text; split on the sentence delimiter into sub-queries
    pub query: String,

    /// Nearest chunks requested per sub-query (optional)
    pub k: Option<usize>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}
