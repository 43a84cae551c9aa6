//! Neighbourhood expansion around hit ids.

use crate::core::types::ChunkId;
use std::collections::BTreeSet;

/// How many neighbours to pull in around each hit.
///
/// A single matched sentence is often a fragment; its neighbours
/// carry the surrounding context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub before: u64,
    pub after: u64,
}

impl Window {
    pub fn new(before: u64, after: u64) -> Self {
        Self { before, after }
    }

    /// Union of `[n - before, n + after]` over every hit `n`.
    ///
    /// Ids below 0 are dropped. No upper clamp is applied; ids past the
    /// end of a collection are simply absent when fetched.
    pub fn expand<I>(&self, hits: I) -> BTreeSet<ChunkId>
    where
        I: IntoIterator<Item = ChunkId>,
    {
        hits.into_iter()
            .flat_map(|n| n.saturating_sub(self.before)..=n.saturating_add(self.after))
            .collect()
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new(1, 3)
    }
}
