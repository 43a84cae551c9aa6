//! In-memory [`VectorStore`] for tests and ephemeral runs.
//!
//! Collections live in a `BTreeMap` behind `std::sync::RwLock`.
//! Similarity is the number of distinct lowercase word tokens a chunk
//! shares with the query; chunks sharing none are never returned.

use super::{tokenize, VectorStore};
use crate::core::error::{PassageError, Result};
use crate::core::types::{Chunk, ChunkId, Collection, CollectionInfo};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::RwLock;

struct StoredCollection {
    chunks: BTreeMap<ChunkId, String>,
    source: Option<String>,
    created_at: DateTime<Utc>,
}

/// Process-local collection store
pub struct MemoryStore {
    collections: RwLock<BTreeMap<String, StoredCollection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(name: &str) -> PassageError {
    PassageError::CollectionNotFound(name.to_string())
}

impl VectorStore for MemoryStore {
    fn create(&self, name: &str, source: Option<&str>) -> Result<Collection> {
        let mut collections = self.collections.write()?;
        if collections.contains_key(name) {
            return Err(PassageError::AlreadyIndexed(name.to_string()));
        }
        collections.insert(
            name.to_string(),
            StoredCollection {
                chunks: BTreeMap::new(),
                source: source.map(str::to_string),
                created_at: Utc::now(),
            },
        );
        Ok(Collection::new(name))
    }

    fn get(&self, name: &str) -> Result<Collection> {
        let collections = self.collections.read()?;
        if collections.contains_key(name) {
            Ok(Collection::new(name))
        } else {
            Err(not_found(name))
        }
    }

    fn delete(&self, name: &str) -> Result<()> {
        self.collections
            .write()?
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| not_found(name))
    }

    fn list(&self) -> Result<Vec<CollectionInfo>> {
        let collections = self.collections.read()?;
        Ok(collections
            .iter()
            .map(|(name, stored)| CollectionInfo {
                name: name.clone(),
                chunks: stored.chunks.len(),
                source: stored.source.clone(),
                created_at: stored.created_at,
                size_bytes: 0,
            })
            .collect())
    }

    fn upsert(&self, collection: &Collection, chunks: &[Chunk]) -> Result<()> {
        let mut collections = self.collections.write()?;
        let stored = collections
            .get_mut(collection.name())
            .ok_or_else(|| not_found(collection.name()))?;
        for chunk in chunks {
            stored.chunks.insert(chunk.id, chunk.text.clone());
        }
        Ok(())
    }

    fn query(
        &self,
        collection: &Collection,
        query_texts: &[&str],
        top_k: usize,
    ) -> Result<Vec<Vec<ChunkId>>> {
        let collections = self.collections.read()?;
        let stored = collections
            .get(collection.name())
            .ok_or_else(|| not_found(collection.name()))?;

        let results = query_texts
            .iter()
            .map(|text| {
                let wanted: HashSet<String> = tokenize(text).collect();
                let mut scored: Vec<(usize, ChunkId)> = stored
                    .chunks
                    .iter()
                    .filter_map(|(id, chunk)| {
                        let shared = tokenize(chunk)
                            .collect::<HashSet<_>>()
                            .intersection(&wanted)
                            .count();
                        (shared > 0).then_some((shared, *id))
                    })
                    .collect();
                // Highest overlap first, ties by ascending id
                scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
                scored.into_iter().take(top_k).map(|(_, id)| id).collect()
            })
            .collect();

        Ok(results)
    }

    fn fetch(
        &self,
        collection: &Collection,
        ids: &BTreeSet<ChunkId>,
    ) -> Result<BTreeMap<ChunkId, String>> {
        let collections = self.collections.read()?;
        let stored = collections
            .get(collection.name())
            .ok_or_else(|| not_found(collection.name()))?;

        Ok(ids
            .iter()
            .filter_map(|id| stored.chunks.get(id).map(|text| (*id, text.clone())))
            .collect())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
