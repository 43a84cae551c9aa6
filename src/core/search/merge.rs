//! Run merging: contiguous chunk ids become one passage.

use crate::core::types::{ChunkId, SENTENCE_DELIMITER};
use std::collections::BTreeMap;

/// Join each maximal run of consecutive ids into a single passage.
///
/// Passages come out in ascending id order. A gap of even one id
/// splits two runs. Ordering depends only on the ids, never on the
/// order the pairs were inserted.
pub fn merge_runs(chunks: &BTreeMap<ChunkId, String>) -> Vec<String> {
    let mut passages = Vec::new();
    let mut run: Vec<&str> = Vec::new();
    let mut last_id: Option<ChunkId> = None;

    for (&id, text) in chunks {
        let contiguous = last_id.is_some_and(|last| last.checked_add(1) == Some(id));
        if !run.is_empty() && !contiguous {
            passages.push(close_run(&run));
            run.clear();
        }
        run.push(text);
        last_id = Some(id);
    }

    if !run.is_empty() {
        passages.push(close_run(&run));
    }
    passages
}

fn close_run(run: &[&str]) -> String {
    let delimiter = SENTENCE_DELIMITER.to_string();
    run.join(delimiter.as_str())
}
