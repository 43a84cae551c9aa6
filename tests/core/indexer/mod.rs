//! Indexer layer tests
//!
//! Document formats and the index pipeline against a Tantivy store.

mod test_pipeline;
