use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt::Write;

use crate::format::{Escape, Format, FormatGrammar, FormatPrimitives, eat_balanced, strip_quotes};

static GRAMMAR: FormatGrammar = FormatGrammar {
    map_start: b'{',
    map_end: b'}',
    list_start: b'[',
    list_end: b']',
    item_separator: b',',
    key_separator: b':',
    quote: b'"',
    escape_chars: &['"', '\\', '\u{8}', '\u{c}', '\n', '\r', '\t'],
    quote_keys: true,
};

/// The JSON format: quoted strings with backslash escapes, always-quoted
/// keys and a `null` literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

/// Skips a `"..."` token with backslash escapes.
fn skip_quoted(bytes: &[u8], index: &mut usize) {
    *index += 1;
    while *index < bytes.len() {
        match bytes[*index] {
            b'\\' => *index += 2,
            b'"' => {
                *index += 1;
                return;
            }
            _ => *index += 1,
        }
    }
    *index = (*index).min(bytes.len());
}

impl FormatPrimitives for Json {
    #[inline]
    fn format(&self) -> Format {
        Format::Json
    }

    #[inline]
    fn grammar(&self) -> &'static FormatGrammar {
        &GRAMMAR
    }

    #[inline]
    fn write_null(&self, out: &mut String) {
        out.push_str("null");
    }

    fn write_string(&self, out: &mut String, value: &str, escape: Escape) {
        out.reserve(value.len() + 2);
        out.push('"');
        for c in value.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                '\u{8}' => out.push_str("\\b"),
                '\u{c}' => out.push_str("\\f"),
                c if (c as u32) < 0x20 => {
                    let _ = write!(out, "\\u{:04x}", c as u32);
                }
                '<' | '>' | '&' | '=' | '\'' if escape.contains(Escape::HTML) => {
                    let _ = write!(out, "\\u{:04x}", c as u32);
                }
                c if escape.contains(Escape::UNICODE) && !c.is_ascii() => {
                    let mut units = [0u16; 2];
                    for unit in c.encode_utf16(&mut units) {
                        let _ = write!(out, "\\u{unit:04x}");
                    }
                }
                c => out.push(c),
            }
        }
        out.push('"');
    }

    fn finish_key(&self, out: &mut String, key: &str) {
        if strip_quotes(key).is_some() {
            out.push_str(key);
        } else {
            self.write_string(out, key, Escape::empty());
        }
    }

    fn eat_value<'a>(&self, text: &'a str, index: &mut usize) -> &'a str {
        self.eat_whitespace(text, index);
        let bytes = text.as_bytes();
        let start = *index;
        let Some(&first) = bytes.get(start) else {
            return "";
        };

        if GRAMMAR.is_open(first) {
            eat_balanced(&GRAMMAR, text, index, skip_quoted);
            return &text[start..*index];
        }
        if first == b'"' {
            skip_quoted(bytes, index);
            return &text[start..*index];
        }

        while *index < bytes.len() {
            let b = bytes[*index];
            if b == b',' || GRAMMAR.is_close(b) || b.is_ascii_whitespace() {
                break;
            }
            *index += 1;
        }
        match &text[start..*index] {
            "null" => "",
            token => token,
        }
    }

    fn eat_map_key<'a>(&self, text: &'a str, index: &mut usize) -> &'a str {
        self.eat_whitespace(text, index);
        let bytes = text.as_bytes();
        let start = *index;
        match bytes.get(start) {
            None | Some(b',' | b'}') => "",
            Some(b'"') => {
                skip_quoted(bytes, index);
                &text[start..*index]
            }
            Some(_) => {
                while *index < bytes.len() {
                    let b = bytes[*index];
                    if matches!(b, b':' | b',' | b'}') || b.is_ascii_whitespace() {
                        break;
                    }
                    *index += 1;
                }
                &text[start..*index]
            }
        }
    }

    fn unescape_string<'a>(&self, token: &'a str) -> Cow<'a, str> {
        let Some(inner) = strip_quotes(token) else {
            return Cow::Borrowed(token);
        };
        if !inner.contains('\\') {
            return Cow::Borrowed(inner);
        }
        Cow::Owned(unescape(inner))
    }

    #[inline]
    fn is_null(&self, token: &str) -> bool {
        token.is_empty() || token == "null"
    }
}

/// Reverses backslash escaping. Unknown escapes keep the escaped character.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('a') => out.push('\u{7}'),
            Some('v') => out.push('\u{b}'),
            Some('u') => {
                let Some(high) = read_hex4(&mut chars) else {
                    out.push_str("\\u");
                    continue;
                };
                if (0xD800..0xDC00).contains(&high) {
                    let mut ahead = chars.clone();
                    if ahead.next() == Some('\\')
                        && ahead.next() == Some('u')
                        && let Some(low) = read_hex4(&mut ahead)
                        && (0xDC00..0xE000).contains(&low)
                    {
                        chars = ahead;
                        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                        out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                        continue;
                    }
                }
                out.push(char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn read_hex4(chars: &mut core::str::Chars<'_>) -> Option<u32> {
    let mut code = 0;
    for _ in 0..4 {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    Some(code)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::Json;
    use crate::format::{Escape, FormatPrimitives};

    fn written(value: &str, escape: Escape) -> String {
        let mut out = String::new();
        Json.write_string(&mut out, value, escape);
        out
    }

    #[test]
    fn escapes_strings() {
        assert_eq!(written("a\"b\\c\n", Escape::UNICODE), r#""a\"b\\c\n""#);
        assert_eq!(written("\u{1}", Escape::UNICODE), r#""\u0001""#);
        assert_eq!(written("é😀", Escape::UNICODE), r#""\u00e9\ud83d\ude00""#);
        assert_eq!(written("é", Escape::empty()), "\"é\"");
    }

    #[test]
    fn escapes_html() {
        let text = "<a href='x'>&</a>=";
        assert_eq!(written(text, Escape::empty()), "\"<a href='x'>&</a>=\"");
        assert_eq!(
            written(text, Escape::HTML),
            r#""\u003ca href\u003d\u0027x\u0027\u003e\u0026\u003c/a\u003e\u003d""#
        );
    }

    #[test]
    fn unescapes_strings() {
        assert_eq!(Json.unescape_string(r#""plain""#), "plain");
        assert_eq!(Json.unescape_string(r#""a\"b\/c\t""#), "a\"b/c\t");
        assert_eq!(Json.unescape_string(r#""é😀""#), "é😀");
        assert_eq!(Json.unescape_string("42"), "42");
        assert_eq!(Json.unescape_safe_string(r#""2020-01-01""#), "2020-01-01");
    }

    #[test]
    fn eats_values() {
        let text = r#" {"a":[1,"]"]} , "x\"y" ,null,12.5]"#;
        let mut i = 0;
        assert_eq!(Json.eat_value(text, &mut i), r#"{"a":[1,"]"]}"#);
        assert!(Json.eat_item_separator_or_map_end(text, &mut i));
        assert_eq!(Json.eat_value(text, &mut i), r#""x\"y""#);
        assert!(Json.eat_item_separator_or_map_end(text, &mut i));
        assert_eq!(Json.eat_value(text, &mut i), "");
        assert!(Json.eat_item_separator_or_map_end(text, &mut i));
        assert_eq!(Json.eat_value(text, &mut i), "12.5");
    }

    #[test]
    fn eats_keys() {
        let mut i = 0;
        assert_eq!(Json.eat_map_key(r#""na\"me":1"#, &mut i), r#""na\"me""#);
        let mut i = 0;
        assert_eq!(Json.eat_map_key("bare : 1", &mut i), "bare");
        let mut i = 0;
        assert_eq!(Json.eat_map_key("}", &mut i), "");
    }

    #[test]
    fn keys_are_quoted() {
        let mut out = String::new();
        Json.finish_key(&mut out, "12");
        Json.finish_key(&mut out, "\"k\"");
        assert_eq!(out, r#""12""k""#);
    }
}
