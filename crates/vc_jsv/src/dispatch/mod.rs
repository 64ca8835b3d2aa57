//! Writer and parser resolution.
//!
//! [`resolve_writer`] and [`resolve_parser`] turn a [`TypeInfo`] into a
//! type-erased [`WriteFn`] or [`ParseFn`] for one [`Format`]. Both are
//! memoized per `(format, type)` in a [`SnapshotMap`], so concurrent first
//! uses may build the same function twice but always publish one.
//!
//! A parser is selected in this order, the first match winning:
//!
//! 1. a custom override from [`custom`](crate::custom);
//! 2. enums, by name or integer value;
//! 3. strings;
//! 4. the loosely-typed [`Value`](crate::value::Value) slot;
//! 5. opaque types, through their string factory;
//! 6. the remaining scalars;
//! 7. lists, maps and tuples, through the [`codec`](crate::codec) cache;
//! 8. structs, through their [`TypeDescriptor`](crate::access::TypeDescriptor)
//!    and the `__type` contract;
//! 9. abstract slots, through the type tag of the text.
//!
//! `Option<T>` wraps the function of `T`. Writers follow the same order.
//!
//! Nested functions are resolved on first use rather than when the outer
//! function is built, which lets recursive types resolve.

// -----------------------------------------------------------------------------
// Modules

mod abstracts;
mod dynamic;
mod enums;
mod object;
mod scalar;

// -----------------------------------------------------------------------------
// Exports

pub use dynamic::{read_value, write_value};

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use core::any::{Any, TypeId};
use std::sync::{LazyLock, OnceLock};

use vc_utils::SnapshotMap;

use crate::config::Config;
use crate::format::{Format, FormatPrimitives};
use crate::info::{InfoFn, OpaqueInfo, OptionInfo, TypeInfo};
use crate::{Error, Result};

// -----------------------------------------------------------------------------
// Context

/// The format and config of one top-level call.
///
/// The config is read once when the call starts and passed down, so a
/// cached function never bakes in a policy.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    format: Format,
    config: &'a Config,
}

impl<'a> Context<'a> {
    #[inline]
    pub const fn new(format: Format, config: &'a Config) -> Self {
        Self { format, config }
    }

    #[inline]
    pub const fn format(&self) -> Format {
        self.format
    }

    #[inline]
    pub fn primitives(&self) -> &'static dyn FormatPrimitives {
        self.format.primitives()
    }

    #[inline]
    pub const fn config(&self) -> &'a Config {
        self.config
    }
}

// -----------------------------------------------------------------------------
// Function types

/// Writes an erased value.
pub type WriteFn = Arc<dyn Fn(&mut String, &dyn Any, &Context<'_>) + Send + Sync>;

/// Reads a value token.
///
/// `Ok(None)` means null, or a value skipped after a logged warning.
pub type ParseFn = Arc<dyn Fn(&str, &Context<'_>) -> Result<Option<Box<dyn Any>>> + Send + Sync>;

static WRITERS: LazyLock<SnapshotMap<(Format, TypeId), WriteFn>> =
    LazyLock::new(SnapshotMap::new);

static PARSERS: LazyLock<SnapshotMap<(Format, TypeId), ParseFn>> =
    LazyLock::new(SnapshotMap::new);

/// Wraps a closure into a [`WriteFn`].
#[inline]
pub fn write_fn(f: impl Fn(&mut String, &dyn Any, &Context<'_>) + Send + Sync + 'static) -> WriteFn {
    Arc::new(f)
}

/// Wraps a closure into a [`ParseFn`].
#[inline]
pub fn parse_fn(
    f: impl Fn(&str, &Context<'_>) -> Result<Option<Box<dyn Any>>> + Send + Sync + 'static,
) -> ParseFn {
    Arc::new(f)
}

/// Returns the cached writer of `info`, building it on first use.
pub fn resolve_writer(format: Format, info: &'static TypeInfo) -> WriteFn {
    WRITERS.get_or_insert_with((format, info.type_id()), || {
        log::debug!("building {format} writer of `{}`", info.type_path());
        build_writer(format, info)
    })
}

/// Returns the cached parser of `info`, building it on first use.
pub fn resolve_parser(format: Format, info: &'static TypeInfo) -> ParseFn {
    PARSERS.get_or_insert_with((format, info.type_id()), || {
        log::debug!("building {format} parser of `{}`", info.type_path());
        build_parser(format, info)
    })
}

/// Returns `true` if a writer of `type_id` is cached for `format`.
pub fn has_writer(format: Format, type_id: TypeId) -> bool {
    WRITERS.contains_key(&(format, type_id))
}

/// Returns `true` if a parser of `type_id` is cached for `format`.
pub fn has_parser(format: Format, type_id: TypeId) -> bool {
    PARSERS.contains_key(&(format, type_id))
}

/// Counts the cached writers and parsers of `type_id`, over both formats.
pub fn cached_count(type_id: TypeId) -> usize {
    WRITERS.count_keys(|(_, id)| *id == type_id) + PARSERS.count_keys(|(_, id)| *id == type_id)
}

/// Drops every cached writer and parser, so the next call rebuilds them.
pub fn reset_caches() {
    WRITERS.clear();
    PARSERS.clear();
    crate::codec::reset_cache();
}

// -----------------------------------------------------------------------------
// Lazy nested functions

/// The writer of a nested type, resolved on first use.
pub(crate) struct LazyWriter {
    format: Format,
    info: InfoFn,
    cell: OnceLock<WriteFn>,
}

impl LazyWriter {
    pub(crate) const fn new(format: Format, info: InfoFn) -> Self {
        Self {
            format,
            info,
            cell: OnceLock::new(),
        }
    }

    #[inline]
    pub(crate) fn get(&self) -> &WriteFn {
        self.cell
            .get_or_init(|| resolve_writer(self.format, (self.info)()))
    }
}

/// The parser of a nested type, resolved on first use.
pub(crate) struct LazyParser {
    format: Format,
    info: InfoFn,
    cell: OnceLock<ParseFn>,
}

impl LazyParser {
    pub(crate) const fn new(format: Format, info: InfoFn) -> Self {
        Self {
            format,
            info,
            cell: OnceLock::new(),
        }
    }

    #[inline]
    pub(crate) fn get(&self) -> &ParseFn {
        self.cell
            .get_or_init(|| resolve_parser(self.format, (self.info)()))
    }
}

// -----------------------------------------------------------------------------
// Building

fn build_writer(format: Format, info: &'static TypeInfo) -> WriteFn {
    if let Some(custom) = crate::custom::writer(info.type_id()) {
        return custom;
    }
    match info {
        TypeInfo::Primitive(info) => scalar::writer(info.kind()),
        TypeInfo::Option(info) => option_writer(format, info),
        TypeInfo::Enum(info) => enums::writer(info),
        TypeInfo::List(info) => {
            let codec = crate::codec::sequence(format, info);
            write_fn(move |out, value, cx| codec.write(out, value, info, cx))
        }
        TypeInfo::Map(info) => {
            let codec = crate::codec::map(format, info);
            write_fn(move |out, value, cx| codec.write(out, value, info, cx))
        }
        TypeInfo::Tuple(info) => {
            let codec = crate::codec::tuple(format, info);
            write_fn(move |out, value, cx| codec.write(out, value, cx))
        }
        TypeInfo::Struct(info) => object::writer(format, info),
        TypeInfo::Opaque(info) => opaque_writer(info),
        TypeInfo::Dynamic(_) => dynamic::writer(),
        TypeInfo::Abstract(info) => abstracts::writer(info),
    }
}

fn build_parser(format: Format, info: &'static TypeInfo) -> ParseFn {
    let parse = match crate::custom::parser(info.type_id()) {
        Some(custom) => custom,
        None => build_shape_parser(format, info),
    };
    match crate::custom::on_deserialized(info.type_id()) {
        Some(hook) => parse_fn(move |text, cx| {
            let mut value = parse(text, cx)?;
            if let Some(value) = &mut value {
                hook(&mut **value);
            }
            Ok(value)
        }),
        None => parse,
    }
}

fn build_shape_parser(format: Format, info: &'static TypeInfo) -> ParseFn {
    match info {
        TypeInfo::Enum(info) => enums::parser(info),
        TypeInfo::Dynamic(_) => dynamic::parser(),
        TypeInfo::Opaque(info) => opaque_parser(info),
        TypeInfo::Primitive(info) => scalar::parser(info.kind()),
        TypeInfo::List(info) => {
            let codec = crate::codec::sequence(format, info);
            parse_fn(move |text, cx| match codec.read(text, cx)? {
                Some(items) => info.from_items(items).map(Some),
                None => Ok(None),
            })
        }
        TypeInfo::Map(info) => {
            let codec = crate::codec::map(format, info);
            parse_fn(move |text, cx| match codec.read(text, cx)? {
                Some(entries) => info.from_entries(entries).map(Some),
                None => Ok(None),
            })
        }
        TypeInfo::Tuple(info) => {
            let codec = crate::codec::tuple(format, info);
            parse_fn(move |text, cx| codec.read(text, cx))
        }
        TypeInfo::Option(option) => option_parser(format, option),
        TypeInfo::Struct(struct_info) => object::parser(format, struct_info, info),
        TypeInfo::Abstract(_) => abstracts::parser(info),
    }
}

// -----------------------------------------------------------------------------
// Option

fn option_writer(format: Format, info: &'static OptionInfo) -> WriteFn {
    let some = LazyWriter::new(format, info.some());
    write_fn(move |out, value, cx| match info.get(value) {
        Some(inner) => some.get()(out, inner, cx),
        None => cx.primitives().write_null(out),
    })
}

fn option_parser(format: Format, info: &'static OptionInfo) -> ParseFn {
    let some = LazyParser::new(format, info.some());
    parse_fn(move |text, cx| {
        if cx.primitives().is_null(text.trim()) {
            return Ok(Some(info.none()));
        }
        match some.get()(text, cx)? {
            Some(inner) => info.wrap(inner).map(Some).ok_or(Error::TypeMismatch {
                expected: info.type_path(),
            }),
            None => Ok(Some(info.none())),
        }
    })
}

// -----------------------------------------------------------------------------
// Opaque

fn opaque_writer(info: &'static OpaqueInfo) -> WriteFn {
    write_fn(move |out, value, cx| {
        let mut text = String::new();
        info.to_text(value, &mut text);
        cx.primitives()
            .write_string(out, &text, cx.config().escape());
    })
}

fn opaque_parser(info: &'static OpaqueInfo) -> ParseFn {
    parse_fn(move |text, cx| {
        let p = cx.primitives();
        let token = text.trim();
        if p.is_null(token) {
            return Ok(None);
        }
        info.from_text(&p.unescape_string(token)).map(Some)
    })
}

// -----------------------------------------------------------------------------
// Shared helpers

/// Downcasts a value handed to a writer, logging when the descriptor lied.
pub(crate) fn expect_ref<T: Any>(value: &dyn Any) -> Option<&T> {
    let found = value.downcast_ref::<T>();
    if found.is_none() {
        log::error!("writer of `{}` got another type", core::any::type_name::<T>());
    }
    found
}

/// Reads the type tag named `attr` when it is the first member of a map
/// token.
pub(crate) fn extract_type_tag<'a>(
    text: &'a str,
    p: &dyn FormatPrimitives,
    attr: &str,
) -> Option<Cow<'a, str>> {
    let text = text.trim_start();
    if !text.starts_with('{') {
        return None;
    }
    let mut index = 0;
    p.eat_map_start(text, &mut index);
    let key = p.eat_map_key(text, &mut index);
    if p.unescape_string(key) != attr {
        return None;
    }
    p.eat_map_key_separator(text, &mut index);
    let value = p.eat_value(text, &mut index);
    if p.is_null(value) {
        return None;
    }
    Some(p.unescape_string(value))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::any::TypeId;
    use std::sync::Barrier;
    use std::thread;

    use super::{Context, extract_type_tag, resolve_parser, resolve_writer};
    use crate::config::Config;
    use crate::derive::Typed;
    use crate::format::Format;
    use crate::info::Typed as _;

    #[derive(Typed, Default, Debug, PartialEq)]
    struct FirstUse {
        id: u32,
        tags: Vec<String>,
    }

    #[test]
    fn concurrent_first_use_agrees() {
        const THREADS: usize = 8;
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|n| {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let config = Config::default();
                    let cx = Context::new(Format::Jsv, &config);
                    let value = FirstUse {
                        id: n as u32,
                        tags: vec!["a".into()],
                    };
                    let mut out = String::new();
                    resolve_writer(Format::Jsv, FirstUse::type_info())(&mut out, &value, &cx);
                    let back = resolve_parser(Format::Jsv, FirstUse::type_info())(&out, &cx)
                        .unwrap()
                        .unwrap();
                    *back.downcast::<FirstUse>().unwrap() == value
                })
            })
            .collect();

        assert!(handles.into_iter().all(|h| h.join().unwrap()));
        assert!(!super::has_writer(Format::Json, TypeId::of::<FirstUse>()));
    }

    #[test]
    fn options_wrap_their_inner_function() {
        let config = Config::default();
        let cx = Context::new(Format::Json, &config);
        let info = <Option<u8>>::type_info();

        let mut out = String::new();
        resolve_writer(Format::Json, info)(&mut out, &None::<u8>, &cx);
        resolve_writer(Format::Json, info)(&mut out, &Some(4_u8), &cx);
        assert_eq!(out, "null4");

        let parse = resolve_parser(Format::Json, info);
        let none = parse("null", &cx).unwrap().unwrap();
        assert_eq!(none.downcast_ref::<Option<u8>>(), Some(&None));
        let some = parse("9", &cx).unwrap().unwrap();
        assert_eq!(some.downcast_ref::<Option<u8>>(), Some(&Some(9)));
    }

    #[test]
    fn type_tag_must_come_first() {
        let p = Format::Json.primitives();
        let tag = extract_type_tag(r#" {"__type":"a::B","x":1}"#, p, "__type");
        assert_eq!(tag.as_deref(), Some("a::B"));
        assert!(extract_type_tag(r#"{"x":1,"__type":"a::B"}"#, p, "__type").is_none());
        assert!(extract_type_tag("[1]", p, "__type").is_none());
        assert!(extract_type_tag(r#"{"__type":"a::B"}"#, p, "$type").is_none());

        let jsv = Format::Jsv.primitives();
        assert_eq!(
            extract_type_tag(r#"{$type:"a::B",x:1}"#, jsv, "$type").as_deref(),
            Some("a::B")
        );
    }
}
