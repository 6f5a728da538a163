//! Slug derivation for card IDs.
//!
//! Slugs keep lowercase ASCII letters, digits and CJK unified ideographs
//! (U+4E00..=U+9FA5); every other run of characters collapses to one hyphen.

use regex::Regex;
use std::sync::LazyLock;

/// Maximum slug length in Unicode code points.
pub const MAX_SLUG_CHARS: usize = 80;

static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\x{4e00}-\x{9fa5}]+").unwrap());

/// Turn a free-form term into a URL-safe identifier.
/// Returns an empty string when the term has no slug characters at all.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let replaced = NON_SLUG_RE.replace_all(&lower, "-");
    let trimmed = replaced.trim_matches('-');
    trimmed.chars().take(MAX_SLUG_CHARS).collect()
}
