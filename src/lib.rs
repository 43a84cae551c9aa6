//! passage - sentence-level document search
//!
//! Documents are split into sentence chunks and stored in a
//! collection. A query is answered with passages: every matching
//! sentence is widened by a window of neighbouring sentences and
//! contiguous runs are joined back into readable excerpts.
//!
//! # Architecture
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types, xdg, naming
//!   - storage (collection stores: Tantivy, in-memory)
//!   - indexer (extraction, chunking, index pipeline with rollback)
//!   - search (window expansion, run merging)
//!   - services (unified service container)
//!
//! - **router**: The "currently selected" collection, outside core
//!
//! - **http**: REST API adapter (axum)
//!
//! - **cli**: Command-line adapter (clap)

// Core domain logic (protocol-agnostic)
pub mod core;

// Active-collection routing
pub mod router;

// HTTP REST adapter
pub mod http;

// CLI adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use crate::core::config::Config;
pub use crate::core::error::{PassageError, Result};
pub use crate::core::services::Services;
pub use crate::core::types::*;
pub use crate::router::CollectionRouter;
