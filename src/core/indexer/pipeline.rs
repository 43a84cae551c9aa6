//! Indexing pipeline orchestration.
//!
//! Coordinates the end-to-end indexing workflow:
//! 1. Sanitize the collection name
//! 2. Create the collection (or report it as already indexed)
//! 3. Extract text
//! 4. Chunk text
//! 5. Store chunks
//!
//! A failure after step 2 deletes the new collection again, so a
//! half-populated collection is never left visible.

use std::sync::Arc;
use std::time::Instant;

use crate::core::error::{PassageError, Result};
use crate::core::indexer::{Chunker, Extractor};
use crate::core::naming::sanitize;
use crate::core::storage::VectorStore;
use crate::core::types::{Collection, IndexOutcome, IndexStats};

/// Orchestrates the indexing pipeline
pub struct IndexingPipeline {
    store: Arc<dyn VectorStore>,
    extractor: Arc<dyn Extractor>,
    chunker: Chunker,
}

impl IndexingPipeline {
    pub fn new(
        store: Arc<dyn VectorStore>,
        extractor: Arc<dyn Extractor>,
        chunker: Chunker,
    ) -> Self {
        Self {
            store,
            extractor,
            chunker,
        }
    }

    /// Index one document as the collection `name`.
    ///
    /// Re-indexing an existing name is a no-op that returns
    /// `IndexOutcome::AlreadyIndexed` without touching stored chunks.
    ///
    /// # Arguments
    ///
    /// * `name` - Requested collection name (sanitized here)
    /// * `filename` - Original filename, used to pick the extractor
    /// * `bytes` - Raw document contents
    pub fn index(&self, name: &str, filename: &str, bytes: &[u8]) -> Result<IndexOutcome> {
        let start = Instant::now();
        let name = sanitize(name)?;

        let collection = match self.store.create(&name, Some(filename)) {
            Ok(collection) => collection,
            Err(PassageError::AlreadyIndexed(_)) => {
                tracing::info!("Collection '{}' already indexed", name);
                // The winner of a concurrent create may still be populating it
                return Ok(IndexOutcome::AlreadyIndexed {
                    collection: Collection::new(name),
                });
            }
            Err(e) => return Err(e),
        };

        match self.populate(&collection, filename, bytes) {
            Ok((chunks_created, chars_extracted)) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                tracing::info!(
                    "Indexed '{}' into '{}': {} chunks from {} chars in {}ms",
                    filename,
                    name,
                    chunks_created,
                    chars_extracted,
                    duration_ms
                );
                Ok(IndexOutcome::Created {
                    stats: IndexStats {
                        collection: name,
                        chunks_created,
                        chars_extracted,
                        duration_ms,
                    },
                    collection,
                })
            }
            Err(e) => {
                tracing::warn!("Indexing '{}' failed, rolling back '{}': {}", filename, name, e);
                if let Err(rollback) = self.store.delete(&name) {
                    tracing::error!("Rollback of '{}' failed: {}", name, rollback);
                }
                Err(e)
            }
        }
    }

    /// Extract, chunk and store; returns (chunks, chars)
    fn populate(
        &self,
        collection: &Collection,
        filename: &str,
        bytes: &[u8],
    ) -> Result<(usize, usize)> {
        let text = self.extractor.extract(filename, bytes)?;
        let chunks = self.chunker.chunk_document(&text, filename)?;
        tracing::debug!("Chunked '{}' into {} sentences", filename, chunks.len());

        self.store.upsert(collection, &chunks)?;
        Ok((chunks.len(), text.chars().count()))
    }
}
