//! Single-pass value scanner.
//!
//! Locates the byte span of one value inside a JSON buffer without building a
//! document tree. Only the children of the top-level container (depth 1) are
//! addressable; anything nested deeper is skipped over while the brace and
//! bracket depth is tracked.
//!
//! The scanner validates just enough to keep its own state consistent and
//! stops as soon as the requested value is closed, so malformed content after
//! the match is never looked at.

use std::ops::Range;

/// A located value: a `(start, len)` view into the scanned buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Offset of the first byte of the value
    pub start: usize,
    /// Length of the value in bytes
    pub len: usize,
}

impl Span {
    /// Offset one past the last byte of the value
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Byte range covered by the span
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Borrow the spanned bytes from the buffer that produced the span
    pub fn slice<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.range()]
    }

    /// Borrow the spanned text from the string that produced the span
    pub fn as_str<'a>(&self, s: &'a str) -> Option<&'a str> {
        s.get(self.range())
    }
}

/// What to look for in the top-level container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query<'k> {
    /// Value following the first key whose raw text is `"` + key + `"`
    Key(&'k [u8]),
    /// Zero-based element position
    Index(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Value,
    Literal,
    String,
    Escape,
    Utf8Continuation(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    None,
    Start,
    End,
    StartStruct,
    EndStruct,
}

/// Find the span of the value addressed by `query`.
///
/// Returns `None` when the value does not exist, when a syntax violation is
/// found before the value closes, or when the buffer ends first.
pub fn extract(buf: &[u8], query: Query<'_>) -> Option<Span> {
    let (key, mut index) = match query {
        Query::Key(key) => (Some(key), 1),
        Query::Index(index) => (None, index),
    };

    let mut state = State::Value;
    let mut depth: i64 = 0;
    let mut value_start: Option<usize> = None;
    let mut key_start: Option<usize> = None;

    let mut pos = 0;
    while pos < buf.len() {
        let c = buf[pos];
        let mut action = Action::None;
        // Position of the last byte belonging to the event.
        let mut at = pos;
        let mut advance = true;

        match state {
            State::Value => match c {
                b' ' | b'\t' | b'\n' | b'\r' | b',' | b':' => {}
                b'"' => {
                    action = Action::Start;
                    state = State::String;
                }
                b'{' | b'[' => action = Action::StartStruct,
                b'}' | b']' => action = Action::EndStruct,
                b't' | b'f' | b'n' | b'-' | b'0'..=b'9' => {
                    action = Action::Start;
                    state = State::Literal;
                }
                _ => return None,
            },
            State::Literal => match c {
                b' ' | b'\t' | b'\n' | b'\r' | b',' | b']' | b'}' | b':' => {
                    // The delimiter is not part of the literal; it is
                    // classified again in the value state.
                    action = Action::End;
                    at = pos - 1;
                    advance = false;
                    state = State::Value;
                }
                b'"' | b'\\' => return None,
                33..=126 => {}
                _ => return None,
            },
            State::String => match c {
                0..=31 | 0x7f..=0xbf | 0xf8..=0xff => return None,
                b'"' => {
                    action = Action::End;
                    state = State::Value;
                }
                b'\\' => state = State::Escape,
                0xc0..=0xdf => state = State::Utf8Continuation(1),
                0xe0..=0xef => state = State::Utf8Continuation(2),
                0xf0..=0xf7 => state = State::Utf8Continuation(3),
                _ => {}
            },
            State::Escape => match c {
                b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' | b'u' => {
                    state = State::String
                }
                _ => return None,
            },
            State::Utf8Continuation(remaining) => {
                if !(0x80..=0xbf).contains(&c) {
                    return None;
                }
                state = if remaining > 1 {
                    State::Utf8Continuation(remaining - 1)
                } else {
                    State::String
                };
            }
        }

        if action == Action::EndStruct {
            depth -= 1;
        }

        if depth == 1 {
            match action {
                Action::Start | Action::StartStruct => {
                    if index == 0 {
                        value_start = Some(at);
                    } else if key.is_some() && index == 1 {
                        key_start = Some(at);
                    } else {
                        index -= 1;
                    }
                }
                Action::End | Action::EndStruct => {
                    if let (Some(start), 0) = (value_start, index) {
                        return Some(Span {
                            start,
                            len: at + 1 - start,
                        });
                    }
                    if let (Some(key), Some(start)) = (key, key_start.take()) {
                        index = if is_quoted_key(&buf[start..=at], key) { 0 } else { 2 };
                    }
                }
                Action::None => {}
            }
        }

        if action == Action::StartStruct {
            depth += 1;
        }

        if advance {
            pos += 1;
        }
    }

    None
}

fn is_quoted_key(token: &[u8], key: &[u8]) -> bool {
    token.len() == key.len() + 2
        && token[0] == b'"'
        && token[token.len() - 1] == b'"'
        && &token[1..token.len() - 1] == key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_key<'a>(buf: &'a str, key: &str) -> Option<&'a str> {
        extract(buf.as_bytes(), Query::Key(key.as_bytes())).and_then(|s| s.as_str(buf))
    }

    fn by_index(buf: &str, index: usize) -> Option<&str> {
        extract(buf.as_bytes(), Query::Index(index)).and_then(|s| s.as_str(buf))
    }

    #[test]
    fn test_key_returns_raw_span() {
        assert_eq!(by_key(r#"{"foo":"bar"}"#, "foo"), Some(r#""bar""#));
        assert_eq!(by_key(r#"{"foo": {"bar": 1}}"#, "foo"), Some(r#"{"bar": 1}"#));
        assert_eq!(by_key(r#"{"a":1,"foo":[1,[2]],"b":2}"#, "foo"), Some("[1,[2]]"));
    }

    #[test]
    fn test_literal_spans() {
        let buf = r#"{"id": 42, "ok": true, "neg": -1.5e3, "nil": null}"#;
        assert_eq!(by_key(buf, "id"), Some("42"));
        assert_eq!(by_key(buf, "ok"), Some("true"));
        assert_eq!(by_key(buf, "neg"), Some("-1.5e3"));
        assert_eq!(by_key(buf, "nil"), Some("null"));
    }

    #[test]
    fn test_literal_followed_by_newline() {
        assert_eq!(by_key("{\"id\": 7\n}", "id"), Some("7"));
        assert_eq!(by_index("[1\t,2\r\n]", 1), Some("2"));
    }

    #[test]
    fn test_index_mode() {
        let buf = r#"["foo", "bar", {"baz": [1, 2]}]"#;
        assert_eq!(by_index(buf, 0), Some(r#""foo""#));
        assert_eq!(by_index(buf, 1), Some(r#""bar""#));
        assert_eq!(by_index(buf, 2), Some(r#"{"baz": [1, 2]}"#));
        assert_eq!(by_index(buf, 3), None);
    }

    #[test]
    fn test_first_matching_key_wins() {
        assert_eq!(by_key(r#"{"k":1,"k":2}"#, "k"), Some("1"));
    }

    #[test]
    fn test_keys_are_not_matched_inside_values() {
        assert_eq!(by_key(r#"{"a":"foo","foo":"x"}"#, "foo"), Some(r#""x""#));
        assert_eq!(by_key(r#"{"a":{"foo":1}}"#, "foo"), None);
    }

    #[test]
    fn test_arrays_are_treated_as_pairs_in_key_mode() {
        assert_eq!(by_key(r#"["foo", "bar"]"#, "foo"), Some(r#""bar""#));
    }

    #[test]
    fn test_key_match_is_exact_bytes() {
        assert_eq!(by_key(r#"{"foo":1}"#, "fo"), None);
        assert_eq!(by_key(r#"{"foo":1}"#, "fooo"), None);
        assert_eq!(by_key(r#"{"f\"o":1}"#, "f\\\"o"), Some("1"));
        assert_eq!(by_key(r#"{"フー":"バー"}"#, "フー"), Some(r#""バー""#));
    }

    #[test]
    fn test_syntax_violations_before_match() {
        assert_eq!(by_key("{\"a\":\"x\u{1}\",\"foo\":1}", "foo"), None);
        assert_eq!(by_key(r#"{"a":"\q","foo":1}"#, "foo"), None);
        assert_eq!(extract(b"{\"a\":\"\x80\",\"foo\":1}", Query::Key(b"foo")), None);
        assert_eq!(extract(b"{\"a\":\"\xc3x\",\"foo\":1}", Query::Key(b"foo")), None);
        assert_eq!(extract(b"[\"\xff\"]", Query::Index(0)), None);
    }

    #[test]
    fn test_quote_or_backslash_inside_literal() {
        assert_eq!(by_index(r#"[1"a",5]"#, 0), None);
        assert_eq!(by_index(r#"[tr\ue,5]"#, 1), None);
        assert_eq!(by_key(r#"{"a":nul"l,"foo":1}"#, "foo"), None);
    }

    #[test]
    fn test_trailing_garbage_after_match_is_ignored() {
        assert_eq!(by_key(r#"{"foo":"bar""#, "foo"), Some(r#""bar""#));
        assert_eq!(by_key("{\"foo\":1,\"x\":\"\u{1}", "foo"), Some("1"));
        assert_eq!(by_index(r#"[1, 2, @@@"#, 1), Some("2"));
    }

    #[test]
    fn test_not_found() {
        assert_eq!(by_index("", 0), None);
        assert_eq!(by_index("[]", 0), None);
        assert_eq!(by_key("{}", "foo"), None);
        assert_eq!(by_key(r#"{"foo":"#, "foo"), None);
        assert_eq!(by_key(r#"{"foo":{"#, "foo"), None);
        assert_eq!(by_key("}", "foo"), None);
        assert_eq!(by_key("{}}", "foo"), None);
        assert_eq!(by_key(r#""foo"#, "foo"), None);
        assert_eq!(by_key("foo", "foo"), None);
        assert_eq!(by_index(r#"{{[[""foo""]]}}"#, 1234), None);
        assert_eq!(by_index("[1", 0), None);
    }

    #[test]
    fn test_span_accessors() {
        let buf = br#"[10,20]"#;
        let span = extract(buf, Query::Index(1)).unwrap();
        assert_eq!(span, Span { start: 4, len: 2 });
        assert_eq!(span.end(), 6);
        assert_eq!(span.slice(buf), b"20");
    }
}
