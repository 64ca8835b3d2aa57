use uuid::Uuid;

use crate::config::{Config, DateHandler, ParseAsType};
use crate::time;
use crate::value::Value;

/// Returns the integer part of a whole number such as `42`, `-7` or `3.00`.
fn whole_part(text: &str) -> Option<&str> {
    let (int, fraction) = text.split_once('.').unwrap_or((text, ""));
    let digits = int.strip_prefix(['-', '+']).unwrap_or(int);
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if digits.is_empty() || !is_digits(digits) || !fraction.bytes().all(|b| b == b'0') {
        return None;
    }
    Some(int)
}

fn looks_numeric(text: &str) -> bool {
    text.bytes().any(|b| b.is_ascii_digit())
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}

/// Narrows to the first allowed integer type the value fits in.
fn narrow(value: i128, allowed: ParseAsType) -> Option<Value> {
    macro_rules! try_as {
        ($flag:ident, $ty:ty, $variant:ident) => {
            if allowed.contains(ParseAsType::$flag)
                && let Ok(v) = <$ty>::try_from(value)
            {
                return Some(Value::$variant(v));
            }
        };
    }
    try_as!(BYTE, u8, U8);
    try_as!(SBYTE, i8, I8);
    try_as!(INT16, i16, I16);
    try_as!(UINT16, u16, U16);
    try_as!(INT32, i32, I32);
    try_as!(UINT32, u32, U32);
    try_as!(INT64, i64, I64);
    try_as!(UINT64, u64, U64);
    None
}

/// Reads a number into the smallest fitting [`Value`].
///
/// A single digit is always a `U8`. Whole numbers, including `3.0`, narrow
/// in the order `u8`, `i8`, `i16`, `u16`, `i32`, `u32`, `i64`, `u64`,
/// skipping the types missing from `parse_primitive_integer_types`. Other
/// numbers are an `F32` when `SINGLE` is allowed and the value survives the
/// narrowing, and an `F64` otherwise.
///
/// Returns `None` if `text` is not a number.
pub fn parse_number(text: &str, config: &Config) -> Option<Value> {
    if let [digit @ b'0'..=b'9'] = text.as_bytes() {
        return Some(Value::U8(digit - b'0'));
    }
    if !looks_numeric(text) {
        return None;
    }

    if let Some(int) = whole_part(text)
        && let Ok(value) = int.parse::<i128>()
        && let Some(narrowed) = narrow(value, config.parse_primitive_integer_types)
    {
        return Some(narrowed);
    }

    let double: f64 = text.parse().ok()?;
    let floats = config.parse_primitive_floating_point_types;
    if floats.contains(ParseAsType::SINGLE)
        && let Ok(single) = text.parse::<f32>()
        && f64::from(single) == double
    {
        return Some(Value::F32(single));
    }
    Some(Value::F64(double))
}

/// Reads an unquoted scalar of a loosely-typed slot.
///
/// Tries the `parse_primitive_fn` of the config, then `true`/`false`, then
/// [`parse_number`].
pub fn parse_primitive(text: &str, config: &Config) -> Option<Value> {
    if let Some(f) = &config.parse_primitive_fn
        && let Some(value) = f(text)
    {
        return Some(value);
    }
    if text.is_empty() {
        return None;
    }
    if text.eq_ignore_ascii_case("true") {
        return Some(Value::Bool(true));
    }
    if text.eq_ignore_ascii_case("false") {
        return Some(Value::Bool(false));
    }
    parse_number(text, config)
}

/// Reads the unescaped content of a quoted scalar of a loosely-typed slot.
///
/// Recognizes GUIDs, WCF dates, and the ISO 8601 and RFC 1123 dates of the
/// matching date handlers. Returns `None` for text that stays a string.
pub fn parse_quoted_primitive(text: &str, config: &Config) -> Option<Value> {
    if let Some(f) = &config.parse_primitive_fn
        && let Some(value) = f(text)
    {
        return Some(value);
    }
    if text.is_empty() {
        return None;
    }
    if let Ok(guid) = Uuid::try_parse(text) {
        return Some(Value::Guid(guid));
    }

    let is_date = if text.starts_with("\\/Date(") || text.starts_with("/Date(") {
        true
    } else {
        let bytes = text.as_bytes();
        match config.date_handler {
            DateHandler::Iso8601 => {
                bytes.len() > 14
                    && bytes[10] == b'T'
                    && (text.ends_with('Z') || matches!(bytes[bytes.len() - 6], b'+' | b'-'))
            }
            DateHandler::Rfc1123 => bytes.len() == 29 && text.ends_with("GMT"),
            _ => false,
        }
    };
    if !is_date {
        return None;
    }
    match time::parse_date_time(text, config) {
        Ok(date) => Some(Value::DateTime(date)),
        Err(e) => {
            log::debug!("`{text}` looked like a date but did not parse: {e}");
            None
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
