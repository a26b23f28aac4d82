//! HTTP surface for food lookups.
//!
//! Serves assembled food documents as JSON with content-hash ETags.

mod etag;
mod server;

pub use etag::{content_hash, if_none_match_matches};
pub use server::{router, serve, AppState};
