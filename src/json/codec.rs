//! String literal escaping and unescaping.

use std::str::Chars;

/// Decode a double-quoted JSON string literal.
///
/// Returns `None` when the input is not quoted, contains an unknown escape or
/// a malformed `\uXXXX` sequence.
pub fn unescape(quoted: &str) -> Option<String> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.next()? {
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '\\' => '\\',
            '/' => '/',
            '"' => '"',
            'u' => decode_unicode(&mut chars)?,
            _ => return None,
        };
        out.push(decoded);
    }
    Some(out)
}

/// Decode the payload of a `\u` escape, joining a surrogate pair when the
/// first unit is a high surrogate.
fn decode_unicode(chars: &mut Chars<'_>) -> Option<char> {
    let first = read_hex4(chars)?;
    let units = if (0xd800..0xdc00).contains(&first) {
        if chars.next()? != '\\' || chars.next()? != 'u' {
            return None;
        }
        let second = read_hex4(chars)?;
        if !(0xdc00..0xe000).contains(&second) {
            return None;
        }
        vec![first, second]
    } else {
        vec![first]
    };

    let mut decoded = char::decode_utf16(units);
    match (decoded.next(), decoded.next()) {
        (Some(Ok(c)), None) => Some(c),
        _ => None,
    }
}

fn read_hex4(chars: &mut Chars<'_>) -> Option<u16> {
    let mut value: u16 = 0;
    for _ in 0..4 {
        let digit = chars.next()?.to_digit(16)?;
        value = (value << 4) | digit as u16;
    }
    Some(value)
}

/// Encode text as a double-quoted JSON string literal.
///
/// U+2028 and U+2029 are escaped as well so the literal can be embedded in
/// evaluated script.
pub fn escape(raw: &str) -> String {
    serde_json::Value::String(raw.to_owned())
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}
