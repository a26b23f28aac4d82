//! Content hashing for ETags.

use sha2::{Digest, Sha256};

/// SHA-256 of `bytes` as a 64-character lowercase hex string.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Whether an `If-None-Match` header value matches `etag`.
///
/// Accepts `*`, comma-separated lists and weak validators (`W/"..."`), which
/// compare equal to their strong form.
pub fn if_none_match_matches(header: &str, etag: &str) -> bool {
    let etag = strip_weak(etag.trim());
    header
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || strip_weak(candidate) == etag)
}

fn strip_weak(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}
