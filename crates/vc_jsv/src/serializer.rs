use alloc::string::String;

use crate::config::Config;
use crate::dispatch::{Context, resolve_parser, resolve_writer};
use crate::format::Format;
use crate::impls::downcast_item;
use crate::info::Typed;
use crate::{Reflect, Result};

// -----------------------------------------------------------------------------
// Shared entry points

fn write_to<T: Typed>(format: Format, out: &mut String, value: &T, config: &Config) {
    let cx = Context::new(format, config);
    resolve_writer(format, T::type_info())(out, value, &cx);
}

fn read_from<T: Typed>(format: Format, text: &str, config: &Config) -> Result<Option<T>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let cx = Context::new(format, config);
    match resolve_parser(format, T::type_info())(text, &cx)? {
        Some(value) => downcast_item::<T>(value).map(Some),
        None => Ok(None),
    }
}

/// Writes a runtime-typed value as JSV with the current config.
pub(crate) fn reflect_to_jsv(value: &dyn Reflect) -> String {
    let config = Config::current();
    let cx = Context::new(Format::Jsv, &config);
    let mut out = String::new();
    resolve_writer(Format::Jsv, value.reflect_type_info())(&mut out, value.as_any(), &cx);
    out
}

macro_rules! impl_serializer {
    ($(#[$meta:meta])* $name:ident, $format:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $name {
            /// Writes `value` with the current config.
            pub fn serialize_to_string<T: Typed>(value: &T) -> String {
                let mut out = String::new();
                Self::serialize_to(&mut out, value);
                out
            }

            /// Appends `value` to `out` with the current config.
            pub fn serialize_to<T: Typed>(out: &mut String, value: &T) {
                write_to($format, out, value, &Config::current());
            }

            /// Writes `value` with an explicit config.
            pub fn serialize_with<T: Typed>(value: &T, config: &Config) -> String {
                let mut out = String::new();
                write_to($format, &mut out, value, config);
                out
            }

            /// Reads a `T` with the current config.
            ///
            /// Empty text and null read as `Ok(None)`.
            pub fn deserialize_from_str<T: Typed>(text: &str) -> Result<Option<T>> {
                read_from($format, text, &Config::current())
            }

            /// Reads a `T` with an explicit config.
            pub fn deserialize_with<T: Typed>(text: &str, config: &Config) -> Result<Option<T>> {
                read_from($format, text, config)
            }
        }
    };
}

impl_serializer!(
    /// Reads and writes JSON.
    ///
    /// ```
    /// use vc_jsv::JsonSerializer;
    ///
    /// let text = JsonSerializer::serialize_to_string(&vec![Some(1), None]);
    /// assert_eq!(text, "[1,null]");
    /// let back: Vec<Option<i32>> = JsonSerializer::deserialize_from_str(&text).unwrap().unwrap();
    /// assert_eq!(back, [Some(1), None]);
    /// ```
    JsonSerializer,
    Format::Json
);

impl_serializer!(
    /// Reads and writes JSV, the compact JSON variant that only quotes
    /// strings when it must.
    ///
    /// ```
    /// use vc_jsv::TypeSerializer;
    ///
    /// let items = vec![String::from("a b"), String::from("c,d")];
    /// let text = TypeSerializer::serialize_to_string(&items);
    /// assert_eq!(text, r#"[a b,"c,d"]"#);
    /// ```
    TypeSerializer,
    Format::Jsv
);

// -----------------------------------------------------------------------------
// Free functions

/// Writes `value` as JSON with the current config.
#[inline]
pub fn to_json<T: Typed>(value: &T) -> String {
    JsonSerializer::serialize_to_string(value)
}

/// Reads JSON into a `T` with the current config.
#[inline]
pub fn from_json<T: Typed>(text: &str) -> Result<Option<T>> {
    JsonSerializer::deserialize_from_str(text)
}

/// Writes `value` as JSV with the current config.
#[inline]
pub fn to_jsv<T: Typed>(value: &T) -> String {
    TypeSerializer::serialize_to_string(value)
}

/// Reads JSV into a `T` with the current config.
#[inline]
pub fn from_jsv<T: Typed>(text: &str) -> Result<Option<T>> {
    TypeSerializer::deserialize_from_str(text)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use crate::Reflect;
    use crate::config::Config;

    #[test]
    fn empty_text_reads_none() {
        assert_eq!(super::from_json::<u8>("  ").unwrap(), None);
        assert_eq!(super::from_jsv::<String>("").unwrap(), None);
        assert_eq!(super::from_json::<Option<u8>>("null").unwrap(), Some(None));
    }

    #[test]
    fn explicit_config() {
        let config = Config {
            escape_unicode: false,
            ..Config::default()
        };
        let text = String::from("é");
        assert_eq!(super::JsonSerializer::serialize_with(&text, &config), "\"é\"");
        assert_eq!(super::JsonSerializer::serialize_with(&text, &Config::default()), r#""\u00e9""#);
    }

    #[test]
    fn reflect_text() {
        let value: Box<dyn Reflect> = Box::new(alloc::vec![1_u8, 2]);
        assert_eq!(super::reflect_to_jsv(&*value), "[1,2]");
    }
}
