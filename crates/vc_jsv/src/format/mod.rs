//! Per-format constants and low-level scanners.
//!
//! Both formats share one grammar for structure:
//!
//! - map: `{` key `:` value (`,` key `:` value)* `}`
//! - list: `[` value (`,` value)* `]`
//!
//! and differ in scalars. [`Json`] quotes every string and escapes with a
//! backslash. [`Jsv`] only quotes strings containing structural characters
//! and escapes a quote by doubling it.
//!
//! Scanners work on a `&str` and a byte cursor. Every structural character is
//! ASCII, so the cursor always sits on a char boundary.
//!
//! An empty token means null. JSON `null` is returned as an empty token by
//! [`FormatPrimitives::eat_value`], an empty JSV string is written `""`.

// -----------------------------------------------------------------------------
// Modules

mod json;
mod jsv;

// -----------------------------------------------------------------------------
// Exports

pub use json::Json;
pub use jsv::Jsv;

use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt;

use bitflags::bitflags;

// -----------------------------------------------------------------------------
// Format

/// The two sibling text formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Format {
    Json,
    Jsv,
}

impl Format {
    /// Returns the scanner and escaping rules of the format.
    #[inline]
    pub fn primitives(self) -> &'static dyn FormatPrimitives {
        match self {
            Self::Json => &Json,
            Self::Jsv => &Jsv,
        }
    }

    #[inline]
    pub fn grammar(self) -> &'static FormatGrammar {
        self.primitives().grammar()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.pad("JSON"),
            Self::Jsv => f.pad("JSV"),
        }
    }
}

// -----------------------------------------------------------------------------
// FormatGrammar

/// The delimiters and escaping facts of one format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatGrammar {
    pub map_start: u8,
    pub map_end: u8,
    pub list_start: u8,
    pub list_end: u8,
    pub item_separator: u8,
    pub key_separator: u8,
    pub quote: u8,
    /// Characters that force a string to be quoted.
    pub escape_chars: &'static [char],
    /// Map keys are always quoted.
    pub quote_keys: bool,
}

impl FormatGrammar {
    /// Returns `true` for `{` and `[`.
    #[inline]
    pub const fn is_open(&self, b: u8) -> bool {
        b == self.map_start || b == self.list_start
    }

    /// Returns `true` for `}` and `]`.
    #[inline]
    pub const fn is_close(&self, b: u8) -> bool {
        b == self.map_end || b == self.list_end
    }
}

// -----------------------------------------------------------------------------
// Escape

bitflags! {
    /// Characters a JSON string is written with as `\uXXXX` besides the
    /// control characters.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Escape: u8 {
        /// Every non-ASCII character.
        const UNICODE = 1;
        /// `<`, `>`, `&`, `=` and `'`.
        const HTML = 1 << 1;
    }
}

// -----------------------------------------------------------------------------
// FormatPrimitives

/// The scanning and escaping contract both formats implement.
pub trait FormatPrimitives: Send + Sync + 'static {
    fn format(&self) -> Format;

    fn grammar(&self) -> &'static FormatGrammar;

    /// Writes the null literal, if the format has one.
    fn write_null(&self, out: &mut String);

    /// Writes a string scalar with the format's quoting and escaping.
    fn write_string(&self, out: &mut String, value: &str, escape: Escape);

    /// Makes sure an already written map key is quoted when the format
    /// requires it.
    fn finish_key(&self, out: &mut String, key: &str);

    /// Advances past whitespace.
    fn eat_whitespace(&self, text: &str, index: &mut usize) {
        let bytes = text.as_bytes();
        while *index < bytes.len() && bytes[*index].is_ascii_whitespace() {
            *index += 1;
        }
    }

    /// Advances past one complete value and returns its text.
    ///
    /// Maps and lists are returned with their delimiters, quoted strings with
    /// their quotes. Returns an empty token for null.
    fn eat_value<'a>(&self, text: &'a str, index: &mut usize) -> &'a str;

    /// Eats the map start, returns `false` and logs when it is missing.
    fn eat_map_start(&self, text: &str, index: &mut usize) -> bool {
        self.eat_whitespace(text, index);
        if text.as_bytes().get(*index) == Some(&self.grammar().map_start) {
            *index += 1;
            true
        } else {
            log::debug!(
                "{} map at {} has no `{{`, reading its members anyway",
                self.format(),
                *index
            );
            false
        }
    }

    /// Advances past one map key and returns its raw text.
    fn eat_map_key<'a>(&self, text: &'a str, index: &mut usize) -> &'a str;

    /// Eats the key separator, returns `false` and logs when it is missing.
    fn eat_map_key_separator(&self, text: &str, index: &mut usize) -> bool {
        self.eat_whitespace(text, index);
        if text.as_bytes().get(*index) == Some(&self.grammar().key_separator) {
            *index += 1;
            true
        } else {
            log::debug!("{} map key at {} has no `:`", self.format(), *index);
            false
        }
    }

    /// Eats the separator after a map value.
    ///
    /// Returns `true` if an item separator was eaten and another entry may
    /// follow, `false` at the map end or the end of the text.
    fn eat_item_separator_or_map_end(&self, text: &str, index: &mut usize) -> bool {
        self.eat_whitespace(text, index);
        let grammar = self.grammar();
        match text.as_bytes().get(*index) {
            Some(&b) if b == grammar.item_separator => {
                *index += 1;
                self.eat_whitespace(text, index);
                true
            }
            Some(&b) if b == grammar.map_end => {
                *index += 1;
                false
            }
            Some(_) => {
                log::debug!(
                    "{} map has an unexpected character at {}",
                    self.format(),
                    *index
                );
                false
            }
            None => false,
        }
    }

    /// Removes the quotes of a string token and reverses its escaping.
    fn unescape_string<'a>(&self, token: &'a str) -> Cow<'a, str>;

    /// Removes the quotes of a token whose content needs no unescaping,
    /// such as a number or a date.
    fn unescape_safe_string<'a>(&self, token: &'a str) -> &'a str {
        strip_quotes(token).unwrap_or(token)
    }

    /// Trims the brackets and surrounding whitespace of a list.
    ///
    /// Returns `None` for null and `Some("")` for an empty list.
    fn strip_list<'a>(&self, text: &'a str) -> Option<&'a str> {
        let text = text.trim();
        if self.is_null(text) {
            return None;
        }
        let grammar = self.grammar();
        let bytes = text.as_bytes();
        let inner = match bytes.first() {
            Some(&b) if b == grammar.list_start => {
                let end = if bytes.last() == Some(&grammar.list_end) && bytes.len() > 1 {
                    text.len() - 1
                } else {
                    log::debug!("{} list has no `]`", self.format());
                    text.len()
                };
                &text[1..end]
            }
            _ => {
                log::debug!("{} list has no `[`, reading it as items", self.format());
                text
            }
        };
        Some(inner.trim())
    }

    /// Returns `true` for the tokens that mean null.
    fn is_null(&self, token: &str) -> bool {
        token.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Shared scanning helpers

/// Returns the content between a leading and trailing `"`.
pub(crate) fn strip_quotes(token: &str) -> Option<&str> {
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        Some(&token[1..token.len() - 1])
    } else {
        None
    }
}

/// Advances past a balanced `{..}` or `[..]`, skipping quoted strings with
/// `skip_quoted`.
fn eat_balanced(
    grammar: &FormatGrammar,
    text: &str,
    index: &mut usize,
    skip_quoted: fn(&[u8], &mut usize),
) {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    while *index < bytes.len() {
        let b = bytes[*index];
        if b == grammar.quote {
            skip_quoted(bytes, index);
            continue;
        }
        *index += 1;
        if grammar.is_open(b) {
            depth += 1;
        } else if grammar.is_close(b) {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return;
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Format, FormatPrimitives};

    #[test]
    fn strip_list_tolerates_missing_brackets() {
        for format in [Format::Json, Format::Jsv] {
            let p = format.primitives();
            assert_eq!(p.strip_list(" [1, 2] "), Some("1, 2"));
            assert_eq!(p.strip_list("[]"), Some(""));
            assert_eq!(p.strip_list("1,2"), Some("1,2"));
            assert_eq!(p.strip_list("[1,2"), Some("1,2"));
            assert_eq!(p.strip_list(""), None);
        }
        assert_eq!(Format::Json.primitives().strip_list("null"), None);
    }

    #[test]
    fn separators() {
        let p: &dyn FormatPrimitives = Format::Jsv.primitives();
        let text = "{a:1,b:2}";
        let mut i = 0;
        assert!(p.eat_map_start(text, &mut i));
        assert_eq!(p.eat_map_key(text, &mut i), "a");
        assert!(p.eat_map_key_separator(text, &mut i));
        assert_eq!(p.eat_value(text, &mut i), "1");
        assert!(p.eat_item_separator_or_map_end(text, &mut i));
        assert_eq!(p.eat_map_key(text, &mut i), "b");
        assert!(p.eat_map_key_separator(text, &mut i));
        assert_eq!(p.eat_value(text, &mut i), "2");
        assert!(!p.eat_item_separator_or_map_end(text, &mut i));
        assert_eq!(i, text.len());
    }

    #[test]
    fn missing_map_start_is_tolerated() {
        let p = Format::Json.primitives();
        let mut i = 0;
        assert!(!p.eat_map_start(r#""a":1"#, &mut i));
        assert_eq!(i, 0);
    }
}
