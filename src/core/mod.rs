//! Core domain logic (protocol-agnostic)
//!
//! This module contains all business logic that is independent
//! of transport protocols (HTTP, CLI).
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **naming**: Collection name sanitization
//! - **storage**: Collection stores (Tantivy, in-memory)
//! - **indexer**: Extraction, sentence chunking and the indexing pipeline
//! - **search**: Window expansion, run merging and passage search
//! - **services**: Unified service container

pub mod config;
pub mod error;
pub mod indexer;
pub mod naming;
pub mod search;
pub mod services;
pub mod storage;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{PassageError, Result};
pub use services::Services;
