//! Storage layer tests
//!
//! Collection lifecycle on the Tantivy-backed store.
