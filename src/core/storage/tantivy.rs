//! Tantivy-backed collection store.
//!
//! Each collection is a directory holding `meta.json` and a Tantivy
//! index. Chunks are ranked with BM25 over their text; ids come back
//! from the `chunk_id` fast field so ranking never loads stored text.

use super::{tokenize, VectorStore};
use crate::core::error::{PassageError, Result};
use crate::core::naming::sanitize;
use crate::core::types::{Chunk, ChunkId, Collection, CollectionInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use tantivy::collector::{DocSetCollector, TopDocs};
use tantivy::query::{QueryParser, TermSetQuery};
use tantivy::schema::{Field, Schema, Value, FAST, INDEXED, STORED, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use walkdir::WalkDir;

/// Current on-disk schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Writer heap (50MB)
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Create the Tantivy schema for chunk storage
///
/// Fields:
/// - chunk_id: Position in the source document (u64 | INDEXED | STORED | FAST)
/// - text: Sentence text (TEXT | STORED)
pub fn create_schema() -> Schema {
    let mut builder = Schema::builder();
    builder.add_u64_field("chunk_id", INDEXED | STORED | FAST);
    builder.add_text_field("text", TEXT | STORED);
    builder.build()
}

/// Contents of `meta.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionMeta {
    pub name: String,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
    pub chunks: usize,
    pub schema_version: u32,
}

/// An opened collection index with a manually reloaded reader
struct OpenIndex {
    index: Index,
    reader: IndexReader,
    chunk_id: Field,
    text: Field,
}

impl OpenIndex {
    fn from_index(index: Index) -> Result<Self> {
        let schema = index.schema();
        let chunk_id = schema
            .get_field("chunk_id")
            .map_err(|e| PassageError::Store(format!("Missing chunk_id field: {e}")))?;
        let text = schema
            .get_field("text")
            .map_err(|e| PassageError::Store(format!("Missing text field: {e}")))?;
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| PassageError::Store(format!("Failed to create reader: {e}")))?;

        Ok(Self {
            index,
            reader,
            chunk_id,
            text,
        })
    }
}

/// Persistent collection store
pub struct TantivyStore {
    /// Directory holding one subdirectory per collection
    root: PathBuf,

    /// Indexes opened so far, keyed by collection name
    open: RwLock<HashMap<String, Arc<OpenIndex>>>,

    /// Serializes upserts and deletes
    write_lock: Mutex<()>,
}

impl TantivyStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            open: RwLock::new(HashMap::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Root data directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of a collection. Names must already be sanitized,
    /// which also keeps them from escaping the root.
    fn collection_dir(&self, name: &str) -> Result<PathBuf> {
        match sanitize(name) {
            Ok(clean) if clean == name => Ok(self.root.join(name)),
            _ => Err(PassageError::InvalidName(name.to_string())),
        }
    }

    fn read_meta(&self, name: &str) -> Result<CollectionMeta> {
        let meta_path = self.collection_dir(name)?.join("meta.json");
        if !meta_path.exists() {
            return Err(PassageError::CollectionNotFound(name.to_string()));
        }

        let contents = fs::read_to_string(&meta_path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_meta(&self, name: &str, meta: &CollectionMeta) -> Result<()> {
        let meta_path = self.collection_dir(name)?.join("meta.json");
        fs::write(meta_path, serde_json::to_string_pretty(meta)?)?;
        Ok(())
    }

    /// Opened index for a collection, opening it on first use
    fn handle(&self, name: &str) -> Result<Arc<OpenIndex>> {
        if let Some(handle) = self.open.read()?.get(name) {
            return Ok(Arc::clone(handle));
        }

        let meta = self.read_meta(name)?;
        if meta.schema_version != SCHEMA_VERSION {
            return Err(PassageError::Store(format!(
                "Collection '{name}' uses schema v{} (current: v{SCHEMA_VERSION}); re-index it",
                meta.schema_version
            )));
        }

        let tantivy_dir = self.collection_dir(name)?.join("tantivy");
        let index = Index::open_in_dir(&tantivy_dir)
            .map_err(|e| PassageError::Store(format!("Failed to open index: {e}")))?;
        let handle = Arc::new(OpenIndex::from_index(index)?);

        let mut open = self.open.write()?;
        Ok(Arc::clone(
            open.entry(name.to_string()).or_insert(handle),
        ))
    }

    fn initialize(&self, name: &str, dir: &Path, source: Option<&str>) -> Result<()> {
        let tantivy_dir = dir.join("tantivy");
        fs::create_dir_all(&tantivy_dir)?;

        let index = Index::create_in_dir(&tantivy_dir, create_schema())
            .map_err(|e| PassageError::Store(format!("Failed to create index: {e}")))?;
        let handle = Arc::new(OpenIndex::from_index(index)?);

        self.write_meta(
            name,
            &CollectionMeta {
                name: name.to_string(),
                source: source.map(str::to_string),
                created_at: Utc::now(),
                chunks: 0,
                schema_version: SCHEMA_VERSION,
            },
        )?;

        self.open.write()?.insert(name.to_string(), handle);
        Ok(())
    }
}

impl VectorStore for TantivyStore {
    fn create(&self, name: &str, source: Option<&str>) -> Result<Collection> {
        let dir = self.collection_dir(name)?;
        fs::create_dir_all(&self.root)?;

        // create_dir is atomic: concurrent creators see exactly one winner
        match fs::create_dir(&dir) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(PassageError::AlreadyIndexed(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        if let Err(e) = self.initialize(name, &dir, source) {
            if let Err(cleanup) = fs::remove_dir_all(&dir) {
                tracing::error!("Failed to remove partial collection {:?}: {}", dir, cleanup);
            }
            return Err(e);
        }

        Ok(Collection::new(name))
    }

    fn get(&self, name: &str) -> Result<Collection> {
        self.read_meta(name)?;
        Ok(Collection::new(name))
    }

    fn delete(&self, name: &str) -> Result<()> {
        let dir = self.collection_dir(name)?;
        if !dir.exists() {
            return Err(PassageError::CollectionNotFound(name.to_string()));
        }

        let _guard = self.write_lock.lock()?;
        self.open.write()?.remove(name);
        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<CollectionInfo>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut collections = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            // Directories without readable metadata are not collections
            if let Ok(meta) = self.read_meta(&name) {
                collections.push(CollectionInfo {
                    name,
                    chunks: meta.chunks,
                    source: meta.source,
                    created_at: meta.created_at,
                    size_bytes: directory_size(&entry.path()),
                });
            }
        }

        collections.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(collections)
    }

    fn upsert(&self, collection: &Collection, chunks: &[Chunk]) -> Result<()> {
        let name = collection.name();
        let handle = self.handle(name)?;
        let _guard = self.write_lock.lock()?;

        let mut writer: IndexWriter = handle
            .index
            .writer(WRITER_HEAP_BYTES)
            .map_err(|e| PassageError::Store(format!("Failed to create writer: {e}")))?;

        for chunk in chunks {
            writer.delete_term(Term::from_field_u64(handle.chunk_id, chunk.id));
            writer
                .add_document(doc!(
                    handle.chunk_id => chunk.id,
                    handle.text => chunk.text.as_str(),
                ))
                .map_err(|e| PassageError::Store(format!("Failed to add chunk: {e}")))?;
        }

        writer
            .commit()
            .map_err(|e| PassageError::Store(format!("Failed to commit: {e}")))?;
        // Releases the directory lock before the next writer is opened
        writer
            .wait_merging_threads()
            .map_err(|e| PassageError::Store(format!("Failed to finish merges: {e}")))?;
        handle.reader.reload()?;

        let mut meta = self.read_meta(name)?;
        meta.chunks = handle.reader.searcher().num_docs() as usize;
        self.write_meta(name, &meta)
    }

    fn query(
        &self,
        collection: &Collection,
        query_texts: &[&str],
        top_k: usize,
    ) -> Result<Vec<Vec<ChunkId>>> {
        let handle = self.handle(collection.name())?;
        if top_k == 0 {
            return Ok(vec![Vec::new(); query_texts.len()]);
        }

        let searcher = handle.reader.searcher();
        let parser = QueryParser::for_index(&handle.index, vec![handle.text]);

        let mut results = Vec::with_capacity(query_texts.len());
        for text in query_texts {
            // Plain lowercase words never trip the query grammar
            let words = tokenize(text).collect::<Vec<_>>().join(" ");
            if words.is_empty() {
                results.push(Vec::new());
                continue;
            }

            let (query, _ignored) = parser.parse_query_lenient(&words);
            let top_docs = searcher
                .search(&*query, &TopDocs::with_limit(top_k))
                .map_err(|e| PassageError::Store(format!("Query failed: {e}")))?;

            let mut ids = Vec::with_capacity(top_docs.len());
            for (_score, address) in top_docs {
                let column = searcher
                    .segment_reader(address.segment_ord)
                    .fast_fields()
                    .u64("chunk_id")
                    .map_err(|e| PassageError::Store(format!("Missing chunk_id column: {e}")))?;
                if let Some(id) = column.first(address.doc_id) {
                    ids.push(id);
                }
            }
            results.push(ids);
        }

        Ok(results)
    }

    fn fetch(
        &self,
        collection: &Collection,
        ids: &BTreeSet<ChunkId>,
    ) -> Result<BTreeMap<ChunkId, String>> {
        let handle = self.handle(collection.name())?;
        if ids.is_empty() {
            return Ok(BTreeMap::new());
        }

        let searcher = handle.reader.searcher();
        let query = TermSetQuery::new(
            ids.iter()
                .map(|id| Term::from_field_u64(handle.chunk_id, *id)),
        );
        let addresses = searcher
            .search(&query, &DocSetCollector)
            .map_err(|e| PassageError::Store(format!("Fetch failed: {e}")))?;

        let mut fetched = BTreeMap::new();
        for address in addresses {
            let doc: TantivyDocument = searcher
                .doc(address)
                .map_err(|e| PassageError::Store(format!("Failed to load chunk: {e}")))?;
            let id = doc.get_first(handle.chunk_id).and_then(|v| v.as_u64());
            let text = doc.get_first(handle.text).and_then(|v| v.as_str());
            if let (Some(id), Some(text)) = (id, text) {
                fetched.insert(id, text.to_string());
            }
        }

        Ok(fetched)
    }

    fn backend(&self) -> &'static str {
        "tantivy"
    }
}

/// Total size of the files under `path`
fn directory_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.metadata().ok())
        .filter(|metadata| metadata.is_file())
        .map(|metadata| metadata.len())
        .sum()
}
