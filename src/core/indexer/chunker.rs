//! Sentence-level text chunking.
//!
//! Documents are split on the literal `.` delimiter. Every sentence
//! becomes one candidate chunk; candidates at or below the minimum
//! length are dropped, and ids are assigned to the survivors in
//! order. The id therefore *is* the chunk's document position, which
//! windowing and run merging rely on.
//!
//! Lengths are measured in characters, not bytes.
//!
//! # Example
//!
//! ```
//! use passage::core::indexer::Chunker;
//!
//! let chunker = Chunker::new(0, 1);
//! let chunks = chunker.chunk_text("One. Two.. Three.");
//!
//! let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
//! assert_eq!(texts, vec!["One", " Two", " Three"]);
//! assert_eq!(chunks[2].id, 2);
//! ```

use crate::core::error::{PassageError, Result};
use crate::core::types::{Chunk, ChunkId, SENTENCE_DELIMITER};

/// Sentence chunker with a configurable length filter.
#[derive(Debug, Clone)]
pub struct Chunker {
    /// Chunks with `chars <= min_chunk_len` are dropped
    min_chunk_len: usize,

    /// Documents with fewer trimmed chars than this are unusable
    min_document_chars: usize,
}

impl Chunker {
    /// Create a new chunker.
    ///
    /// # Arguments
    ///
    /// * `min_chunk_len` - Sentences of this many characters or
    ///   fewer are discarded (0 drops only empty sentences)
    /// * `min_document_chars` - Floor below which a document is
    ///   rejected as empty
    pub fn new(min_chunk_len: usize, min_document_chars: usize) -> Self {
        Self {
            min_chunk_len,
            min_document_chars,
        }
    }

    /// Minimum chunk length in characters.
    pub fn min_chunk_len(&self) -> usize {
        self.min_chunk_len
    }

    /// Split text into ordered chunks with dense ids starting at 0.
    ///
    /// Sentence text is kept verbatim (no trimming), so joining a run
    /// of chunks with the delimiter reproduces the original span.
    pub fn chunk_text(&self, text: &str) -> Vec<Chunk> {
        text.split(SENTENCE_DELIMITER)
            .filter(|sentence| sentence.chars().count() > self.min_chunk_len)
            .enumerate()
            .map(|(position, sentence)| Chunk {
                id: position as ChunkId,
                text: sentence.to_string(),
            })
            .collect()
    }

    /// Chunk a whole extracted document.
    ///
    /// # Errors
    ///
    /// `EmptyDocument` when the text is shorter than the configured
    /// floor, or when no sentence survives the length filter.
    pub fn chunk_document(&self, text: &str, source: &str) -> Result<Vec<Chunk>> {
        let usable = text.trim().chars().count();
        if usable < self.min_document_chars {
            return Err(PassageError::EmptyDocument(format!(
                "{source}: {usable} chars of text, need at least {}",
                self.min_document_chars
            )));
        }

        let chunks = self.chunk_text(text);
        if chunks.is_empty() {
            return Err(PassageError::EmptyDocument(format!(
                "{source}: no sentence longer than {} chars",
                self.min_chunk_len
            )));
        }

        Ok(chunks)
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(0, 8)
    }
}
