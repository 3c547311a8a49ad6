// src/utils/mod.rs

//! Utility functions and helpers.

pub mod http;
pub mod log;

use sha2::{Digest, Sha256};

/// Make a display name safe to use as a file or folder name.
///
/// Strips path separators and characters Windows rejects, then collapses
/// whitespace runs (including newlines) into single spaces.
pub fn sanitize_filename(name: &str) -> String {
    let stripped: String = name
        .chars()
        .filter(|c| !matches!(c, '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|'))
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase hex SHA-256 of a byte slice.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Case-insensitive ordering with exact comparison as the tie-breaker.
pub fn natural_cmp(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
