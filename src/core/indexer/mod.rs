//! Document indexing module.
//!
//! Turns an uploaded document into a collection of sentence chunks:
//!
//! - Format-aware text extraction (plain text, PDF with OCR fallback, EPUB)
//! - Sentence chunking with dense, position-based ids
//! - Indexing pipeline orchestration with rollback on failure

pub mod chunker;
pub mod extract;
pub mod pipeline;

pub use chunker::Chunker;
pub use extract::{DocumentExtractor, DocumentFormat, Extractor};
pub use pipeline::IndexingPipeline;
