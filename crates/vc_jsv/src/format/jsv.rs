use alloc::borrow::Cow;
use alloc::string::String;

use crate::format::{Escape, Format, FormatGrammar, FormatPrimitives, eat_balanced, strip_quotes};

static GRAMMAR: FormatGrammar = FormatGrammar {
    map_start: b'{',
    map_end: b'}',
    list_start: b'[',
    list_end: b']',
    item_separator: b',',
    key_separator: b':',
    quote: b'"',
    escape_chars: &['"', ':', ',', '{', '}', '[', ']', '\r', '\n'],
    quote_keys: false,
};

/// The JSV format: strings are only quoted when they contain one of
/// `" : , { } [ ]` or a line break, and a quote inside a quoted string is
/// doubled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Jsv;

/// Skips a `"..."` token where `""` is an escaped quote.
fn skip_quoted(bytes: &[u8], index: &mut usize) {
    *index += 1;
    while *index < bytes.len() {
        if bytes[*index] == b'"' {
            if bytes.get(*index + 1) == Some(&b'"') {
                *index += 2;
                continue;
            }
            *index += 1;
            return;
        }
        *index += 1;
    }
}

/// Returns `true` if `value` must be quoted to be read back unchanged.
pub(crate) fn needs_quotes(value: &str) -> bool {
    value.is_empty() || value.contains(GRAMMAR.escape_chars)
}

impl Jsv {
    /// Scans an unquoted token up to one of `stops`.
    fn eat_bare<'a>(text: &'a str, index: &mut usize, stops: &[u8]) -> &'a str {
        let bytes = text.as_bytes();
        let start = *index;
        while *index < bytes.len() && !stops.contains(&bytes[*index]) {
            *index += 1;
        }
        &text[start..*index]
    }
}

impl FormatPrimitives for Jsv {
    #[inline]
    fn format(&self) -> Format {
        Format::Jsv
    }

    #[inline]
    fn grammar(&self) -> &'static FormatGrammar {
        &GRAMMAR
    }

    #[inline]
    fn write_null(&self, _out: &mut String) {}

    fn write_string(&self, out: &mut String, value: &str, _escape: Escape) {
        if !needs_quotes(value) {
            out.push_str(value);
            return;
        }
        out.reserve(value.len() + 2);
        out.push('"');
        for c in value.chars() {
            if c == '"' {
                out.push('"');
            }
            out.push(c);
        }
        out.push('"');
    }

    #[inline]
    fn finish_key(&self, out: &mut String, key: &str) {
        out.push_str(key);
    }

    fn eat_value<'a>(&self, text: &'a str, index: &mut usize) -> &'a str {
        let bytes = text.as_bytes();
        let start = *index;
        match bytes.get(start) {
            None => "",
            Some(&b) if GRAMMAR.is_open(b) => {
                eat_balanced(&GRAMMAR, text, index, skip_quoted);
                &text[start..*index]
            }
            Some(b'"') => {
                skip_quoted(bytes, index);
                &text[start..*index]
            }
            Some(_) => Self::eat_bare(text, index, b",}]"),
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
            Some(_) => Self::eat_bare(text, index, b":,}"),
        }
    }

    /// JSV values are not trimmed, so no whitespace is skipped before `:`.
    fn eat_map_key_separator(&self, text: &str, index: &mut usize) -> bool {
        if text.as_bytes().get(*index) == Some(&GRAMMAR.key_separator) {
            *index += 1;
            true
        } else {
            log::debug!("JSV map key at {} has no `:`", *index);
            false
        }
    }

    fn unescape_string<'a>(&self, token: &'a str) -> Cow<'a, str> {
        match strip_quotes(token) {
            Some(inner) if inner.contains("\"\"") => Cow::Owned(inner.replace("\"\"", "\"")),
            Some(inner) => Cow::Borrowed(inner),
            None => Cow::Borrowed(token),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
