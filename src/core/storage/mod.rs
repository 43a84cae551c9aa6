//! Collection storage.
//!
//! Every collection is an isolated set of `(id, text)` chunks. The
//! [`VectorStore`] trait is the seam between the pipelines and the
//! engine that ranks chunks against a query. Two backends ship with
//! the crate:
//!
//! - **TantivyStore**: persistent, one Tantivy index per collection
//! - **MemoryStore**: process-local, used for tests and ephemeral runs
//!
//! # On-disk layout (TantivyStore)
//!
//! ```text
//! {data_dir}/
//! ├── {collection-1}/
//! │   ├── meta.json           # Collection metadata
//! │   └── tantivy/            # Tantivy index
//! └── {collection-2}/
//! ```

mod memory;
mod tantivy;

pub use self::memory::MemoryStore;
pub use self::tantivy::{TantivyStore, SCHEMA_VERSION};

use crate::core::config::StorageConfig;
use crate::core::error::{PassageError, Result};
use crate::core::types::{Chunk, ChunkId, Collection, CollectionInfo};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// A store of named chunk collections with similarity lookup.
///
/// Stores serialize writes internally and allow concurrent reads.
pub trait VectorStore: Send + Sync {
    /// Create an empty collection. Fails with `AlreadyIndexed` if the
    /// name is taken; exactly one of several concurrent creators wins.
    fn create(&self, name: &str, source: Option<&str>) -> Result<Collection>;

    /// Handle to an existing collection, or `CollectionNotFound`
    fn get(&self, name: &str) -> Result<Collection>;

    /// Remove a collection and all of its chunks
    fn delete(&self, name: &str) -> Result<()>;

    /// All collections, sorted by name
    fn list(&self) -> Result<Vec<CollectionInfo>>;

    /// Insert or replace chunks by id
    fn upsert(&self, collection: &Collection, chunks: &[Chunk]) -> Result<()>;

    /// Up to `top_k` ranked chunk ids per query text, one list per text.
    ///
    /// Only ids come back; text is fetched separately for the ids that
    /// survive windowing.
    fn query(
        &self,
        collection: &Collection,
        query_texts: &[&str],
        top_k: usize,
    ) -> Result<Vec<Vec<ChunkId>>>;

    /// Text of the requested ids that exist. Missing ids are absent
    /// from the map rather than an error.
    fn fetch(
        &self,
        collection: &Collection,
        ids: &BTreeSet<ChunkId>,
    ) -> Result<BTreeMap<ChunkId, String>>;

    /// Backend name for logs
    fn backend(&self) -> &'static str;
}

/// Build the store selected by `storage.backend`
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn VectorStore>> {
    match config.backend.as_str() {
        "tantivy" => Ok(Arc::new(TantivyStore::new(config.data_dir.clone()))),
        "memory" => Ok(Arc::new(MemoryStore::new())),
        other => Err(PassageError::Config(format!(
            "Unknown store backend '{other}'"
        ))),
    }
}

/// Lowercase word tokens, split on anything that is not alphanumeric
pub(crate) fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}
