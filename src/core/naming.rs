//! Collection name sanitization.
//!
//! Turns arbitrary input (usually an uploaded filename) into a
//! collection identifier that starts with a letter, does not end with
//! a digit, uses only `[A-Za-z0-9_-]` and is 3 to 63 chars long.
//!
//! The steps run in a fixed order. Padding happens before the letter
//! prefix, and truncation before the trailing-digit fix, so the last
//! step is the only one that can lengthen a truncated name.

use crate::core::error::{PassageError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

// Characters that may not appear in a collection name, compiled once
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]").unwrap());

/// Shortest name before padding kicks in
pub const MIN_NAME_LEN: usize = 3;

/// Length names are truncated to before the trailing-digit fix
pub const MAX_NAME_LEN: usize = 62;

const FILLER: &str = "aaa";
const FIXED_LETTER: char = 'a';

/// Sanitize `raw` into a collection identifier.
///
/// Deterministic and idempotent. Fails only when no allowed character
/// survives the first step.
pub fn sanitize(raw: &str) -> Result<String> {
    let mut name = DISALLOWED.replace_all(raw, "").into_owned();

    if name.is_empty() {
        return Err(PassageError::InvalidName(format!(
            "'{raw}' contains no usable characters"
        )));
    }

    if name.len() < MIN_NAME_LEN {
        name.push_str(FILLER);
    }

    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        name.insert(0, FIXED_LETTER);
    }

    // Only ASCII survives the filter, so byte truncation is char-safe
    name.truncate(MAX_NAME_LEN);

    if name.ends_with(|c: char| c.is_ascii_digit()) {
        name.push(FIXED_LETTER);
    }

    Ok(name)
}
