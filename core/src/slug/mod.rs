//! URL-safe slugs derived from free-text names.
//!
//! # Design
//! Two layers. `markup` handles text-level clean-up with `regex`; `utf8`
//! holds the byte-level validator and the length-bounded percent-encoder,
//! whose stop-before-a-split-character rule has no library equivalent.
//! `slugify_bytes` strings them together and finishes with ASCII-only passes.
//!
//! The pipeline is total: every input, including invalid UTF-8, produces a
//! string made of `a-z`, `0-9`, `_` and `-`, possibly empty.

mod markup;
mod suffix;
mod utf8;

pub use suffix::{random_suffix, random_suffix_with, suffix_range, unique_slug, SLUG_SUFFIX_DIGITS};
pub use utf8::{seems_utf8, utf8_uri_encode};

/// Output budget, in encoder units, for the percent-encoding step.
pub const SLUG_ENCODE_BUDGET: usize = 200;

/// Converts `text` into a lowercase, hyphenated, URL-safe slug.
///
/// ```
/// use orderdaily_core::slug::slugify;
///
/// assert_eq!(slugify("<b>Bold</b> Title"), "bold-title");
/// assert_eq!(slugify("A.B.C"), "a-b-c");
/// ```
pub fn slugify(text: &str) -> String {
    slugify_bytes(text.as_bytes())
}

/// Byte-level entry point; `slugify` delegates here.
pub fn slugify_bytes(input: &[u8]) -> String {
    let stripped = markup::strip_tags(input);
    let mut bytes = markup::strip_stray_percent(&stripped);

    if seems_utf8(&bytes) {
        let lowered = match std::str::from_utf8(&bytes) {
            Ok(text) => text.to_lowercase().into_bytes(),
            // Legacy 5/6-byte forms pass the validator but are not `str`.
            Err(_) => bytes.to_ascii_lowercase(),
        };
        bytes = utf8_uri_encode(&lowered, SLUG_ENCODE_BUDGET).into_bytes();
    }

    bytes.make_ascii_lowercase();
    let mut bytes = markup::strip_entities(&bytes);
    for b in bytes.iter_mut().filter(|b| **b == b'.') {
        *b = b'-';
    }
    bytes.retain(|&b| matches!(b, b'%' | b'a'..=b'z' | b'0'..=b'9' | b' ' | b'_' | b'-'));

    hyphenate(&bytes)
}

/// Collapses space and hyphen runs into one `-`, trims hyphens from both
/// ends, then drops leftover `%` signs.
fn hyphenate(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        let c = if b == b' ' { '-' } else { char::from(b) };
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    let cleaned = out.trim_matches('-').replace('%', "");
    // A pair cut by the encode budget can leave "-%" at the very end.
    cleaned.trim_end_matches('-').to_string()
}
