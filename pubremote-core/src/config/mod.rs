//! Configuration types
//!
//! Link tuning is fixed at build time from `remote.toml`; the peer record is
//! the only thing persisted at runtime, as postcard binary data.

pub mod link;
pub mod peer;

pub use link::*;
pub use peer::*;

/// Longest prefix of `text` holding at most `max_chars` characters
///
/// Used to fit `remote.toml` diagnostics into a fixed-width box. Never
/// splits a multi-byte character.
pub fn clip_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
