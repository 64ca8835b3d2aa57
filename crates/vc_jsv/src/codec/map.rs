use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use crate::dispatch::{Context, LazyParser, LazyWriter};
use crate::format::Format;
use crate::info::{InfoFn, MapInfo};
use crate::state::{DepthGuard, KeyGuard};
use crate::{Error, Result};

/// Writes and reads the entries of any map-shaped container.
pub struct MapCodec {
    value: InfoFn,
    key_writer: LazyWriter,
    key_parser: LazyParser,
    value_writer: LazyWriter,
    value_parser: LazyParser,
}

impl MapCodec {
    pub(super) const fn new(format: Format, key: InfoFn, value: InfoFn) -> Self {
        Self {
            value,
            key_writer: LazyWriter::new(format, key),
            key_parser: LazyParser::new(format, key),
            value_writer: LazyWriter::new(format, value),
            value_parser: LazyParser::new(format, value),
        }
    }

    /// Writes `value`, a container described by `info`, as `{k:v,..}`.
    ///
    /// Null values are skipped unless `include_null_values_in_dictionaries`
    /// is set. Keys are written with the key flag raised, so scalars that
    /// are bare as values come out quoted where the format requires it.
    pub fn write(&self, out: &mut String, value: &dyn Any, info: &MapInfo, cx: &Context<'_>) {
        let p = cx.primitives();
        let config = cx.config();
        let Some(_depth) = DepthGuard::enter(config.max_depth) else {
            p.write_null(out);
            return;
        };

        let value_info = (self.value)();
        let write_key = self.key_writer.get();
        let write_value = self.value_writer.get();
        let mut key_text = String::new();
        let mut first = true;

        out.push('{');
        info.for_each(value, &mut |key, item| {
            if !config.include_null_values_in_dictionaries && value_info.is_null(item) {
                return;
            }
            if !first {
                out.push(',');
            }
            first = false;

            key_text.clear();
            {
                let _key = KeyGuard::set(true);
                write_key(&mut key_text, key, cx);
            }
            p.finish_key(out, &key_text);
            out.push(':');
            write_value(out, item, cx);
        });
        out.push('}');
    }

    /// Reads the entries of a map token in written order.
    ///
    /// Returns `None` for null. Entries with a null key are skipped, null
    /// values become the default of the value type.
    pub fn read(
        &self,
        text: &str,
        cx: &Context<'_>,
    ) -> Result<Option<Vec<(Box<dyn Any>, Box<dyn Any>)>>> {
        let p = cx.primitives();
        let text = text.trim();
        if p.is_null(text) {
            return Ok(None);
        }
        let Some(_depth) = DepthGuard::enter(cx.config().max_depth) else {
            return Ok(None);
        };

        let parse_key = self.key_parser.get();
        let parse_value = self.value_parser.get();
        let mut entries = Vec::new();
        let mut index = 0;
        p.eat_map_start(text, &mut index);

        loop {
            let raw_key = p.eat_map_key(text, &mut index);
            if raw_key.is_empty() {
                break;
            }
            p.eat_map_key_separator(text, &mut index);
            let raw_value = p.eat_value(text, &mut index);

            match parse_key(raw_key, cx)? {
                None => log::debug!("map entry with a null key skipped"),
                Some(key) => {
                    let value = match parse_value(raw_value, cx)? {
                        Some(value) => value,
                        None => self.default_value()?,
                    };
                    entries.push((key, value));
                }
            }

            if !p.eat_item_separator_or_map_end(text, &mut index) {
                break;
            }
        }
        Ok(Some(entries))
    }

    fn default_value(&self) -> Result<Box<dyn Any>> {
        let value = (self.value)();
        value.default_value().ok_or(Error::NoDefault {
            type_path: value.type_path(),
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::config::Config;
    use crate::dispatch::{Context, resolve_parser, resolve_writer};
    use crate::format::Format;
    use crate::info::Typed;
    use crate::Result;

    fn write<T: Typed>(format: Format, value: &T, config: &Config) -> String {
        let mut out = String::new();
        resolve_writer(format, T::type_info())(&mut out, value, &Context::new(format, config));
        out
    }

    fn read<T: Typed>(format: Format, text: &str) -> Result<Option<T>> {
        let config = Config::default();
        let parsed = resolve_parser(format, T::type_info())(text, &Context::new(format, &config))?;
        Ok(parsed.and_then(|v| v.downcast::<T>().ok()).map(|v| *v))
    }

    #[test]
    fn keys_are_quoted_per_format() {
        let config = Config::default();
        let map: BTreeMap<u32, String> = [(1, "a".into()), (20, "b c".into())].into();
        assert_eq!(write(Format::Json, &map, &config), r#"{"1":"a","20":"b c"}"#);
        assert_eq!(write(Format::Jsv, &map, &config), "{1:a,20:b c}");

        let back: BTreeMap<u32, String> = read(Format::Json, r#"{"1":"a","20":"b c"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn null_values() {
        let map: BTreeMap<String, Option<u8>> = [("a".into(), None), ("b".into(), Some(2))].into();
        assert_eq!(write(Format::Json, &map, &Config::default()), r#"{"b":2}"#);

        let config = Config {
            include_null_values_in_dictionaries: true,
            ..Config::default()
        };
        assert_eq!(write(Format::Json, &map, &config), r#"{"a":null,"b":2}"#);

        let back: BTreeMap<String, Option<u8>> = read(Format::Json, r#"{"a":null,"b":2}"#)
            .unwrap()
            .unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn nested_maps_and_lists() {
        let text = "{x:[1,2],y:[]}";
        let back: BTreeMap<String, Vec<u8>> = read(Format::Jsv, text).unwrap().unwrap();
        assert_eq!(back["x"], [1, 2]);
        assert!(back["y"].is_empty());
        assert_eq!(write(Format::Jsv, &back, &Config::default()), text);
    }

    #[test]
    fn missing_braces_are_tolerated() {
        let back: BTreeMap<String, u8> = read(Format::Jsv, "a:1,b:2").unwrap().unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back["b"], 2);
    }
}
