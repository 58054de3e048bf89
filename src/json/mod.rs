//! Minimal JSON support for the bridge wire format.
//!
//! Values are located with a single forward scan ([`scanner`]) and string
//! literals are decoded on demand ([`codec`]). There is no document tree.

pub mod codec;
pub mod scanner;

pub use codec::{escape, unescape};
pub use scanner::{extract, Query, Span};

/// Extract a value from a JSON buffer as text.
///
/// A non-empty `key` selects the value following that key in the top-level
/// container; an empty `key` selects the element at `index` instead. A
/// negative `index` never matches.
///
/// String values are unescaped, every other value is returned as its raw
/// text. An empty string is returned when nothing is found, so a missing
/// value and a value that decodes to `""` look the same.
pub fn parse(s: &str, key: &str, index: i64) -> String {
    extract_str(s, key, index)
        .and_then(|raw| {
            if raw.starts_with('"') {
                unescape(raw)
            } else {
                Some(raw.to_owned())
            }
        })
        .unwrap_or_default()
}

/// Locate a value like [`parse`] but return the raw, undecoded text.
pub fn extract_str<'a>(s: &'a str, key: &str, index: i64) -> Option<&'a str> {
    let query = if key.is_empty() {
        Query::Index(usize::try_from(index).ok()?)
    } else {
        Query::Key(key.as_bytes())
    };
    extract(s.as_bytes(), query)?.as_str(s)
}
