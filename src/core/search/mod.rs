//! Passage retrieval.
//!
//! Similarity hits are widened into neighbourhoods ([`Window`]), the
//! resulting ids are fetched, and contiguous runs are merged into
//! passages ([`merge_runs`]).

mod merge;
mod service;
mod window;

pub use merge::merge_runs;
pub use service::{validate_query, SearchService};
pub use window::Window;
