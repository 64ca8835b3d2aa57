use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use super::{Context, ParseFn, WriteFn, expect_ref, extract_type_tag, parse_fn, write_fn};
use super::{resolve_parser, resolve_writer};
use super::scalar::{write_float, write_guid};
use crate::Result;
use crate::format::{Format, strip_quotes};
use crate::info::{TypeKind, Typed};
use crate::registry::resolve_type_tag;
use crate::state::{DepthGuard, DynamicGuard, KeyGuard};
use crate::time;
use crate::value::{Value, parse_number, parse_primitive, parse_quoted_primitive};

pub(super) fn writer() -> WriteFn {
    write_fn(|out, value, cx| {
        if let Some(value) = expect_ref::<Value>(value) {
            write_value(out, value, cx);
        }
    })
}

pub(super) fn parser() -> ParseFn {
    parse_fn(|text, cx| Ok(Some(Box::new(read_value(text, cx)?))))
}

// -----------------------------------------------------------------------------
// Writing

/// Writes a loosely-typed value.
///
/// Objects are written by their concrete type, with a `__type` tag when
/// they are structs.
pub fn write_value(out: &mut String, value: &Value, cx: &Context<'_>) {
    let p = cx.primitives();
    let config = cx.config();
    match value {
        Value::Null => p.write_null(out),
        Value::Bool(v) => {
            let _ = write!(out, "{v}");
        }
        Value::U8(v) => {
            let _ = write!(out, "{v}");
        }
        Value::I8(v) => {
            let _ = write!(out, "{v}");
        }
        Value::I16(v) => {
            let _ = write!(out, "{v}");
        }
        Value::U16(v) => {
            let _ = write!(out, "{v}");
        }
        Value::I32(v) => {
            let _ = write!(out, "{v}");
        }
        Value::U32(v) => {
            let _ = write!(out, "{v}");
        }
        Value::I64(v) => {
            let _ = write!(out, "{v}");
        }
        Value::U64(v) => {
            let _ = write!(out, "{v}");
        }
        Value::F32(v) => write_float(out, v, v.is_finite(), cx),
        Value::F64(v) => write_float(out, v, v.is_finite(), cx),
        Value::String(v) => p.write_string(out, v, config.escape()),
        Value::Guid(v) => write_guid(out, v, cx),
        Value::DateTime(v) => time::write_date_time(out, v, cx.format(), config),
        Value::List(items) => {
            let Some(_depth) = DepthGuard::enter(config.max_depth) else {
                p.write_null(out);
                return;
            };
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_value(out, item, cx);
            }
            out.push(']');
        }
        Value::Map(entries) => {
            let Some(_depth) = DepthGuard::enter(config.max_depth) else {
                p.write_null(out);
                return;
            };
            out.push('{');
            let mut first = true;
            for (key, item) in entries {
                if item.is_null() && !config.include_null_values_in_dictionaries {
                    continue;
                }
                if !first {
                    out.push(',');
                }
                first = false;
                {
                    let _key = KeyGuard::set(true);
                    p.write_string(out, key, config.escape());
                }
                out.push(':');
                write_value(out, item, cx);
            }
            out.push('}');
        }
        Value::Object(object) => {
            let object: &dyn crate::Reflect = &**object;
            let info = object.reflect_type_info();
            let _dynamic = DynamicGuard::set(true);
            resolve_writer(cx.format(), info)(out, object.as_any(), cx);
        }
    }
}

// -----------------------------------------------------------------------------
// Reading

/// Reads a loosely-typed value.
///
/// In order:
///
/// 1. null reads as [`Value::Null`];
/// 2. a map whose first member is an allowed `__type` struct reads as
///    [`Value::Object`];
/// 3. with `convert_object_types_into_string_dictionary`, maps and lists
///    read as [`Value::Map`] and [`Value::List`];
/// 4. with `try_to_parse_primitive_type_values` or
///    `try_to_parse_numeric_type`, scalars are narrowed through
///    [`parse_primitive`] or [`parse_number`];
/// 5. anything else is kept as [`Value::String`].
pub fn read_value(text: &str, cx: &Context<'_>) -> Result<Value> {
    let p = cx.primitives();
    let config = cx.config();
    let text = text.trim();
    if p.is_null(text) {
        return Ok(Value::Null);
    }

    if text.starts_with('{')
        && let Some(tag) = extract_type_tag(text, p, &config.type_attr)
        && let Some(info) = resolve_type_tag(&tag, Value::type_info(), config)
    {
        if info.kind() == TypeKind::Struct {
            let parsed = resolve_parser(cx.format(), info)(text, cx)?;
            return Ok(parsed
                .and_then(|parsed| info.into_reflect(parsed))
                .map_or(Value::Null, Value::Object));
        }
        log::warn!(
            "`{}` in `{}` is not a struct, read as a plain value",
            info.type_path(),
            config.type_attr
        );
    }

    if config.convert_object_types_into_string_dictionary {
        if text.starts_with('{') {
            return read_map(text, cx);
        }
        if text.starts_with('[') {
            return read_list(text, cx);
        }
    }

    let primitives = config.try_to_parse_primitive_type_values;
    if primitives || config.try_to_parse_numeric_type {
        let parsed = match cx.format() {
            Format::Json => match strip_quotes(text) {
                Some(_) => {
                    let unquoted = p.unescape_string(text);
                    if primitives {
                        parse_quoted_primitive(&unquoted, config)
                    } else {
                        None
                    }
                }
                None if primitives => parse_primitive(text, config),
                None => parse_number(text, config),
            },
            Format::Jsv => {
                let unquoted = p.unescape_string(text);
                if primitives {
                    parse_primitive(&unquoted, config)
                        .or_else(|| parse_quoted_primitive(&unquoted, config))
                } else {
                    parse_number(&unquoted, config)
                }
            }
        };
        if let Some(value) = parsed {
            return Ok(value);
        }
    }

    Ok(Value::String(p.unescape_string(text).into_owned()))
}

fn read_map(text: &str, cx: &Context<'_>) -> Result<Value> {
    let p = cx.primitives();
    let Some(_depth) = DepthGuard::enter(cx.config().max_depth) else {
        return Ok(Value::Null);
    };

    let mut entries = BTreeMap::new();
    let mut index = 0;
    p.eat_map_start(text, &mut index);
    loop {
        let raw_key = p.eat_map_key(text, &mut index);
        if raw_key.is_empty() {
            break;
        }
        let key = p.unescape_string(raw_key);
        p.eat_map_key_separator(text, &mut index);
        let value = p.eat_value(text, &mut index);
        if key != cx.config().type_attr {
            entries.insert(key.into_owned(), read_value(value, cx)?);
        }
        if !p.eat_item_separator_or_map_end(text, &mut index) {
            break;
        }
    }
    Ok(Value::Map(entries))
}

fn read_list(text: &str, cx: &Context<'_>) -> Result<Value> {
    let p = cx.primitives();
    let Some(inner) = p.strip_list(text) else {
        return Ok(Value::Null);
    };
    let Some(_depth) = DepthGuard::enter(cx.config().max_depth) else {
        return Ok(Value::Null);
    };

    let mut items = Vec::new();
    if inner.is_empty() {
        return Ok(Value::List(items));
    }

    // An empty slot, trailing ones included, reads as `Null`.
    let bytes = inner.as_bytes();
    let mut index = 0;
    loop {
        p.eat_whitespace(inner, &mut index);
        let item = p.eat_value(inner, &mut index);
        items.push(read_value(item, cx)?);
        p.eat_whitespace(inner, &mut index);
        match bytes.get(index) {
            None => break,
            Some(b',') => index += 1,
            Some(_) => {
                log::debug!("list has an unexpected character at {index}, rest skipped");
                break;
            }
        }
    }
    Ok(Value::List(items))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;

    use super::{read_value, write_value};
    use crate::config::Config;
    use crate::derive::Typed;
    use crate::dispatch::Context;
    use crate::format::Format;
    use crate::value::Value;

    #[derive(Typed, Default, Debug, PartialEq)]
    #[jsv(runtime_serializable, auto_register)]
    struct DynamicPayload {
        name: String,
        size: u16,
    }

    fn written(format: Format, value: &Value, config: &Config) -> String {
        let mut out = String::new();
        write_value(&mut out, value, &Context::new(format, config));
        out
    }

    #[test]
    fn nested_maps_and_lists() {
        let config = Config::default();
        let mut map = BTreeMap::new();
        map.insert("a".into(), Value::List(vec![Value::U8(1), Value::from("x y")]));
        map.insert("b".into(), Value::Null);
        let value = Value::Map(map);

        assert_eq!(written(Format::Json, &value, &config), r#"{"a":[1,"x y"]}"#);
        assert_eq!(written(Format::Jsv, &value, &config), "{a:[1,x y]}");

        let config = Config {
            include_null_values_in_dictionaries: true,
            ..Config::default()
        };
        assert_eq!(written(Format::Json, &value, &config), r#"{"a":[1,"x y"],"b":null}"#);
    }

    #[test]
    fn strings_by_default() {
        let config = Config::default();
        let cx = Context::new(Format::Json, &config);
        assert_eq!(read_value("12", &cx).unwrap(), Value::from("12"));
        assert_eq!(read_value(r#""a\"b""#, &cx).unwrap(), Value::from("a\"b"));
        assert_eq!(read_value("null", &cx).unwrap(), Value::Null);
        assert_eq!(
            read_value(r#"{"a":1}"#, &cx).unwrap(),
            Value::from(r#"{"a":1}"#)
        );
    }

    #[test]
    fn narrowed_scalars() {
        let config = Config {
            try_to_parse_primitive_type_values: true,
            convert_object_types_into_string_dictionary: true,
            ..Config::default()
        };
        let cx = Context::new(Format::Json, &config);
        let value = read_value(r#"{"n":300,"f":true,"s":"x","l":[1,-1]}"#, &cx).unwrap();
        assert_eq!(value.get("n"), Some(&Value::U16(300)));
        assert_eq!(value.get("f"), Some(&Value::Bool(true)));
        assert_eq!(value.get("s"), Some(&Value::from("x")));
        assert_eq!(
            value.get("l"),
            Some(&Value::List(vec![Value::U8(1), Value::I8(-1)]))
        );

        let numeric = Config {
            try_to_parse_numeric_type: true,
            ..Config::default()
        };
        let cx = Context::new(Format::Jsv, &numeric);
        assert_eq!(read_value("2.5", &cx).unwrap(), Value::F64(2.5));
        assert_eq!(read_value("true", &cx).unwrap(), Value::from("true"));
    }

    #[test]
    fn trailing_list_slot_is_null() {
        let config = Config {
            try_to_parse_primitive_type_values: true,
            convert_object_types_into_string_dictionary: true,
            ..Config::default()
        };
        for format in [Format::Json, Format::Jsv] {
            let cx = Context::new(format, &config);
            assert_eq!(
                read_value("[1,2,]", &cx).unwrap(),
                Value::List(vec![Value::U8(1), Value::U8(2), Value::Null])
            );
            assert_eq!(
                read_value("[,1]", &cx).unwrap(),
                Value::List(vec![Value::Null, Value::U8(1)])
            );
            assert_eq!(read_value("[]", &cx).unwrap(), Value::List(vec![]));
        }
    }

    #[test]
    fn tagged_objects() {
        let config = Config::default();
        let cx = Context::new(Format::Json, &config);
        let text = r#"{"__type":"vc_jsv::dispatch::dynamic::tests::DynamicPayload","name":"n","size":4}"#;
        let value = read_value(text, &cx).unwrap();
        let payload = value.downcast_ref::<DynamicPayload>().unwrap();
        assert_eq!(payload.size, 4);
        assert_eq!(written(Format::Json, &value, &config), text);

        // Unknown tags leave the text alone.
        let text = r#"{"__type":"Evil.Type","cmd":"rm"}"#;
        assert_eq!(read_value(text, &cx).unwrap(), Value::from(text));
    }
}
