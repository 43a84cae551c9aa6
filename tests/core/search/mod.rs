//! Search layer tests
//!
//! Passage reconstruction against a real Tantivy collection.

mod test_passages;
