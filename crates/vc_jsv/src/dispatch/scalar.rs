use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;
use core::fmt::{Display, Write};

use chrono::{FixedOffset, NaiveDate, TimeDelta, TimeZone, Utc};
use uuid::Uuid;

use super::{Context, ParseFn, WriteFn, expect_ref, parse_fn, write_fn};
use crate::format::{Escape, Format};
use crate::info::PrimitiveKind;
use crate::time::{self, DateTime, DateTimeKind};
use crate::{Error, Result};

// -----------------------------------------------------------------------------
// Writers

macro_rules! display_writer {
    ($ty:ty) => {
        write_fn(|out, value, _| {
            if let Some(value) = expect_ref::<$ty>(value) {
                let _ = write!(out, "{value}");
            }
        })
    };
}

macro_rules! float_writer {
    ($ty:ty) => {
        write_fn(|out, value, cx| {
            if let Some(value) = expect_ref::<$ty>(value) {
                write_float(out, *value, value.is_finite(), cx);
            }
        })
    };
}

/// Writes a float with the shortest text that reads back to the same value.
///
/// JSON has no literal for NaN and the infinities, they are written `null`.
pub(crate) fn write_float(out: &mut String, value: impl Display, finite: bool, cx: &Context<'_>) {
    if !finite && cx.format() == Format::Json {
        cx.primitives().write_null(out);
        return;
    }
    let _ = write!(out, "{value}");
}

pub(crate) fn write_guid(out: &mut String, value: &Uuid, cx: &Context<'_>) {
    let mut buffer = Uuid::encode_buffer();
    let text = value.simple().encode_lower(&mut buffer);
    cx.primitives().write_string(out, text, Escape::empty());
}

pub(super) fn writer(kind: PrimitiveKind) -> WriteFn {
    match kind {
        PrimitiveKind::Bool => display_writer!(bool),
        PrimitiveKind::I8 => display_writer!(i8),
        PrimitiveKind::I16 => display_writer!(i16),
        PrimitiveKind::I32 => display_writer!(i32),
        PrimitiveKind::I64 => display_writer!(i64),
        PrimitiveKind::I128 => display_writer!(i128),
        PrimitiveKind::Isize => display_writer!(isize),
        PrimitiveKind::U8 => display_writer!(u8),
        PrimitiveKind::U16 => display_writer!(u16),
        PrimitiveKind::U32 => display_writer!(u32),
        PrimitiveKind::U64 => display_writer!(u64),
        PrimitiveKind::U128 => display_writer!(u128),
        PrimitiveKind::Usize => display_writer!(usize),
        PrimitiveKind::F32 => float_writer!(f32),
        PrimitiveKind::F64 => float_writer!(f64),
        PrimitiveKind::Char => write_fn(|out, value, cx| {
            if let Some(value) = expect_ref::<char>(value) {
                let mut buffer = [0; 4];
                cx.primitives().write_string(
                    out,
                    value.encode_utf8(&mut buffer),
                    cx.config().escape(),
                );
            }
        }),
        PrimitiveKind::String => write_fn(|out, value, cx| {
            if let Some(value) = expect_ref::<String>(value) {
                cx.primitives()
                    .write_string(out, value, cx.config().escape());
            }
        }),
        PrimitiveKind::Guid => write_fn(|out, value, cx| {
            if let Some(value) = expect_ref::<Uuid>(value) {
                write_guid(out, value, cx);
            }
        }),
        PrimitiveKind::DateTime => write_fn(|out, value, cx| {
            if let Some(value) = expect_ref::<DateTime>(value) {
                time::write_date_time(out, value, cx.format(), cx.config());
            }
        }),
        PrimitiveKind::UtcDateTime => write_fn(|out, value, cx| {
            if let Some(value) = expect_ref::<chrono::DateTime<Utc>>(value) {
                let value = DateTime::new(value.naive_utc(), DateTimeKind::Utc);
                time::write_date_time(out, &value, cx.format(), cx.config());
            }
        }),
        PrimitiveKind::DateTimeOffset => write_fn(|out, value, cx| {
            if let Some(value) = expect_ref::<chrono::DateTime<FixedOffset>>(value) {
                time::write_date_offset(out, value, cx.format(), cx.config());
            }
        }),
        PrimitiveKind::DateOnly => write_fn(|out, value, cx| {
            if let Some(value) = expect_ref::<NaiveDate>(value) {
                time::write_date_only(out, value, cx.format(), cx.config());
            }
        }),
        PrimitiveKind::TimeSpan => write_fn(|out, value, cx| {
            if let Some(value) = expect_ref::<TimeDelta>(value) {
                time::write_time_span(out, value, cx.format(), cx.config());
            }
        }),
    }
}

// -----------------------------------------------------------------------------
// Parsers

/// Strips the quotes of a scalar token, `None` for null.
fn scalar_text<'a>(token: &'a str, cx: &Context<'_>) -> Option<&'a str> {
    let p = cx.primitives();
    let token = token.trim();
    if p.is_null(token) {
        return None;
    }
    Some(p.unescape_safe_string(token).trim())
}

fn boxed<T: Any>(value: T) -> Result<Option<Box<dyn Any>>> {
    Ok(Some(Box::new(value)))
}

macro_rules! from_str_parser {
    ($ty:ty, $kind:ident) => {
        parse_fn(|token, cx| {
            let Some(text) = scalar_text(token, cx) else {
                return Ok(None);
            };
            match text.parse::<$ty>() {
                Ok(value) => boxed(value),
                Err(_) => Err(Error::invalid(PrimitiveKind::$kind.name(), text)),
            }
        })
    };
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") || text == "1" {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") || text == "0" {
        Some(false)
    } else {
        None
    }
}

pub(super) fn parser(kind: PrimitiveKind) -> ParseFn {
    match kind {
        PrimitiveKind::Bool => parse_fn(|token, cx| {
            let Some(text) = scalar_text(token, cx) else {
                return Ok(None);
            };
            match parse_bool(text) {
                Some(value) => boxed(value),
                None => Err(Error::invalid("bool", text)),
            }
        }),
        PrimitiveKind::I8 => from_str_parser!(i8, I8),
        PrimitiveKind::I16 => from_str_parser!(i16, I16),
        PrimitiveKind::I32 => from_str_parser!(i32, I32),
        PrimitiveKind::I64 => from_str_parser!(i64, I64),
        PrimitiveKind::I128 => from_str_parser!(i128, I128),
        PrimitiveKind::Isize => from_str_parser!(isize, Isize),
        PrimitiveKind::U8 => from_str_parser!(u8, U8),
        PrimitiveKind::U16 => from_str_parser!(u16, U16),
        PrimitiveKind::U32 => from_str_parser!(u32, U32),
        PrimitiveKind::U64 => from_str_parser!(u64, U64),
        PrimitiveKind::U128 => from_str_parser!(u128, U128),
        PrimitiveKind::Usize => from_str_parser!(usize, Usize),
        PrimitiveKind::F32 => from_str_parser!(f32, F32),
        PrimitiveKind::F64 => from_str_parser!(f64, F64),
        PrimitiveKind::Char => parse_fn(|token, cx| {
            let p = cx.primitives();
            let token = token.trim();
            if p.is_null(token) {
                return Ok(None);
            }
            let text = p.unescape_string(token);
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => boxed(c),
                _ => Err(Error::invalid("char", text)),
            }
        }),
        PrimitiveKind::String => parse_fn(|token, cx| {
            let p = cx.primitives();
            if p.is_null(token.trim()) {
                return Ok(None);
            }
            boxed(p.unescape_string(token).into_owned())
        }),
        PrimitiveKind::Guid => parse_fn(|token, cx| {
            let Some(text) = scalar_text(token, cx) else {
                return Ok(None);
            };
            match Uuid::try_parse(text) {
                Ok(value) => boxed(value),
                Err(e) => Err(Error::invalid("guid", alloc::format!("{text} ({e})"))),
            }
        }),
        PrimitiveKind::DateTime => parse_fn(|token, cx| {
            let Some(text) = scalar_text(token, cx) else {
                return Ok(None);
            };
            boxed(time::parse_date_time(text, cx.config())?)
        }),
        PrimitiveKind::UtcDateTime => parse_fn(|token, cx| {
            let Some(text) = scalar_text(token, cx) else {
                return Ok(None);
            };
            let value = time::parse_date_time(text, cx.config())?.to_utc();
            boxed(Utc.from_utc_datetime(&value.naive()))
        }),
        PrimitiveKind::DateTimeOffset => parse_fn(|token, cx| {
            let Some(text) = scalar_text(token, cx) else {
                return Ok(None);
            };
            boxed(time::parse_date_offset(text, cx.config())?)
        }),
        PrimitiveKind::DateOnly => parse_fn(|token, cx| {
            let Some(text) = scalar_text(token, cx) else {
                return Ok(None);
            };
            boxed(time::parse_date_only(text, cx.config())?)
        }),
        PrimitiveKind::TimeSpan => parse_fn(|token, cx| {
            let Some(text) = scalar_text(token, cx) else {
                return Ok(None);
            };
            boxed(time::parse_time_span(text)?)
        }),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use chrono::TimeDelta;
    use uuid::Uuid;

    use crate::config::Config;
    use crate::dispatch::{Context, resolve_parser, resolve_writer};
    use crate::format::Format;
    use crate::info::Typed;

    fn write<T: Typed>(format: Format, value: &T) -> String {
        let config = Config::default();
        let mut out = String::new();
        resolve_writer(format, T::type_info())(&mut out, value, &Context::new(format, &config));
        out
    }

    fn parse<T: Typed + Clone>(format: Format, text: &str) -> crate::Result<Option<T>> {
        let config = Config::default();
        let parsed = resolve_parser(format, T::type_info())(text, &Context::new(format, &config))?;
        Ok(parsed.and_then(|v| v.downcast_ref::<T>().cloned()))
    }

    #[test]
    fn numbers() {
        assert_eq!(write(Format::Json, &-12_i32), "-12");
        assert_eq!(write(Format::Json, &0.1_f64), "0.1");
        assert_eq!(write(Format::Json, &f64::NAN), "null");
        assert_eq!(write(Format::Jsv, &f32::INFINITY), "inf");

        assert_eq!(parse::<u16>(Format::Json, "  42 ").unwrap(), Some(42));
        assert_eq!(parse::<i64>(Format::Json, r#""-7""#).unwrap(), Some(-7));
        assert_eq!(parse::<u8>(Format::Json, "null").unwrap(), None);
        assert!(parse::<u8>(Format::Jsv, "300").is_err());
    }

    #[test]
    fn strings_and_chars() {
        assert_eq!(write(Format::Json, &String::from("a\"b")), r#""a\"b""#);
        assert_eq!(write(Format::Jsv, &String::from("a,b")), r#""a,b""#);
        assert_eq!(write(Format::Jsv, &String::new()), r#""""#);
        assert_eq!(write(Format::Json, &'é'), r#""\u00e9""#);

        assert_eq!(parse::<String>(Format::Jsv, r#""""#).unwrap(), Some(String::new()));
        assert_eq!(parse::<String>(Format::Jsv, "").unwrap(), None);
        assert_eq!(parse::<char>(Format::Json, r#""x""#).unwrap(), Some('x'));
        assert!(parse::<char>(Format::Json, r#""xy""#).is_err());
    }

    #[test]
    fn bools() {
        assert_eq!(write(Format::Jsv, &true), "true");
        assert_eq!(parse::<bool>(Format::Json, "False").unwrap(), Some(false));
        assert_eq!(parse::<bool>(Format::Jsv, "1").unwrap(), Some(true));
        assert!(parse::<bool>(Format::Jsv, "yes").is_err());
    }

    #[test]
    fn guids_use_the_compact_form() {
        let id = Uuid::from_u128(0x8f5c3d1e_3b2a_4c5d_9e8f_0a1b2c3d4e5f);
        assert_eq!(write(Format::Json, &id), r#""8f5c3d1e3b2a4c5d9e8f0a1b2c3d4e5f""#);
        assert_eq!(write(Format::Jsv, &id), "8f5c3d1e3b2a4c5d9e8f0a1b2c3d4e5f");
        assert_eq!(
            parse::<Uuid>(Format::Jsv, "8f5c3d1e-3b2a-4c5d-9e8f-0a1b2c3d4e5f").unwrap(),
            Some(id)
        );
    }

    #[test]
    fn time_spans() {
        let span = TimeDelta::minutes(90);
        assert_eq!(write(Format::Json, &span), r#""PT1H30M""#);
        assert_eq!(write(Format::Jsv, &span), "PT1H30M");
        assert_eq!(parse::<TimeDelta>(Format::Json, r#""01:30:00""#).unwrap(), Some(span));
    }
}
