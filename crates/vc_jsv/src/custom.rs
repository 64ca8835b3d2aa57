//! Per-type overrides of the built-in writers and parsers.
//!
//! An override replaces the function [`dispatch`](crate::dispatch) would
//! build for a type, in both formats. Setting or clearing one drops every
//! cached function, since containers and structs hold the functions of
//! their members.
//!
//! ```
//! use vc_jsv::custom;
//!
//! #[derive(vc_jsv::derive::Typed, Default, Debug, PartialEq)]
//! struct Meters {
//!     value: u32,
//! }
//!
//! custom::set_serialize_fn::<Meters>(|m| format!("{}m", m.value));
//! custom::set_deserialize_fn::<Meters>(|text| {
//!     let value = text.trim_end_matches('m').parse().map_err(vc_jsv::Error::custom)?;
//!     Ok(Meters { value })
//! });
//!
//! assert_eq!(vc_jsv::to_json(&Meters { value: 3 }), r#""3m""#);
//! let back: Meters = vc_jsv::from_jsv("3m").unwrap().unwrap();
//! assert_eq!(back, Meters { value: 3 });
//! # custom::clear::<Meters>();
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use core::any::{Any, TypeId};
use std::sync::LazyLock;

use vc_utils::SnapshotMap;

use crate::Result;
use crate::dispatch::{self, ParseFn, WriteFn, parse_fn, write_fn};
use crate::info::Typed;

/// A hook run on every value of a type after it was read.
pub type OnDeserializedHook = Arc<dyn Fn(&mut dyn Any) + Send + Sync>;

static WRITERS: LazyLock<SnapshotMap<TypeId, WriteFn>> = LazyLock::new(SnapshotMap::new);
static PARSERS: LazyLock<SnapshotMap<TypeId, ParseFn>> = LazyLock::new(SnapshotMap::new);
static ON_DESERIALIZED: LazyLock<SnapshotMap<TypeId, OnDeserializedHook>> =
    LazyLock::new(SnapshotMap::new);

// -----------------------------------------------------------------------------
// Setters

/// Writes `T` as the string returned by `f`, quoted and escaped as a string.
pub fn set_serialize_fn<T: Typed>(f: impl Fn(&T) -> String + Send + Sync + 'static) {
    let writer = write_fn(move |out, value, cx| {
        if let Some(value) = dispatch::expect_ref::<T>(value) {
            cx.primitives()
                .write_string(out, &f(value), cx.config().escape());
        }
    });
    install(&WRITERS, TypeId::of::<T>(), writer, T::type_path());
}

/// Writes `T` as the text returned by `f`, unchanged.
///
/// The text must be a valid token of every format it is used with.
pub fn set_raw_serialize_fn<T: Typed>(f: impl Fn(&T) -> String + Send + Sync + 'static) {
    let writer = write_fn(move |out, value, _| {
        if let Some(value) = dispatch::expect_ref::<T>(value) {
            out.push_str(&f(value));
        }
    });
    install(&WRITERS, TypeId::of::<T>(), writer, T::type_path());
}

/// Reads `T` with `f`, from the unquoted and unescaped token.
///
/// Null tokens do not reach `f`.
pub fn set_deserialize_fn<T: Typed>(f: impl Fn(&str) -> Result<T> + Send + Sync + 'static) {
    let parser = parse_fn(move |text, cx| {
        let p = cx.primitives();
        let token = text.trim();
        if p.is_null(token) {
            return Ok(None);
        }
        let value: Box<dyn Any> = Box::new(f(&p.unescape_string(token))?);
        Ok(Some(value))
    });
    install(&PARSERS, TypeId::of::<T>(), parser, T::type_path());
}

/// Reads `T` with `f`, from the raw token.
pub fn set_raw_deserialize_fn<T: Typed>(f: impl Fn(&str) -> Result<T> + Send + Sync + 'static) {
    let parser = parse_fn(move |text, _| {
        let value: Box<dyn Any> = Box::new(f(text)?);
        Ok(Some(value))
    });
    install(&PARSERS, TypeId::of::<T>(), parser, T::type_path());
}

/// Runs `f` on every `T` after it was read, whatever parser read it.
pub fn set_on_deserialized<T: Typed>(f: impl Fn(&mut T) + Send + Sync + 'static) {
    let hook: OnDeserializedHook = Arc::new(move |value: &mut dyn Any| {
        if let Some(value) = value.downcast_mut::<T>() {
            f(value);
        }
    });
    install(&ON_DESERIALIZED, TypeId::of::<T>(), hook, T::type_path());
}

fn install<V: Clone>(map: &SnapshotMap<TypeId, V>, id: TypeId, value: V, type_path: &str) {
    log::debug!("custom function installed for `{type_path}`");
    map.insert(id, value);
    dispatch::reset_caches();
}

/// Removes the overrides and hook of `T`.
pub fn clear<T: Typed>() {
    let id = TypeId::of::<T>();
    WRITERS.remove(&id);
    PARSERS.remove(&id);
    ON_DESERIALIZED.remove(&id);
    dispatch::reset_caches();
}

/// Removes every override and hook.
pub fn clear_all() {
    WRITERS.clear();
    PARSERS.clear();
    ON_DESERIALIZED.clear();
    dispatch::reset_caches();
}

// -----------------------------------------------------------------------------
// Lookup

pub(crate) fn writer(id: TypeId) -> Option<WriteFn> {
    WRITERS.get(&id)
}

pub(crate) fn parser(id: TypeId) -> Option<ParseFn> {
    PARSERS.get(&id)
}

pub(crate) fn on_deserialized(id: TypeId) -> Option<OnDeserializedHook> {
    ON_DESERIALIZED.get(&id)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::derive::Typed;
    use crate::{Error, from_json, from_jsv, to_json, to_jsv};

    #[derive(Typed, Default, Debug, PartialEq)]
    struct Celsius {
        degrees: i32,
    }

    #[derive(Typed, Default, Debug, PartialEq)]
    struct Reading {
        at: Celsius,
        history: Vec<Celsius>,
    }

    #[derive(Typed, Default, Debug, PartialEq)]
    struct Normalized {
        name: String,
    }

    #[test]
    fn overrides_reach_nested_members() {
        super::set_serialize_fn::<Celsius>(|c| alloc::format!("{}C", c.degrees));
        super::set_deserialize_fn::<Celsius>(|text| {
            let degrees = text.trim_end_matches('C').parse().map_err(Error::custom)?;
            Ok(Celsius { degrees })
        });

        let reading = Reading {
            at: Celsius { degrees: 20 },
            history: alloc::vec![Celsius { degrees: -3 }],
        };
        let json = to_json(&reading);
        assert_eq!(json, r#"{"at":"20C","history":["-3C"]}"#);
        assert_eq!(from_json::<Reading>(&json).unwrap(), Some(reading));
        assert_eq!(to_jsv(&Celsius { degrees: 1 }), "1C");

        super::clear::<Celsius>();
        assert_eq!(to_jsv(&Celsius { degrees: 1 }), "{degrees:1}");
    }

    #[test]
    fn raw_functions_skip_escaping() {
        super::set_raw_serialize_fn::<Normalized>(|n| alloc::format!("[{}]", n.name.len()));
        assert_eq!(to_json(&Normalized { name: "abc".into() }), "[3]");
        super::clear::<Normalized>();
    }

    #[test]
    fn hooks_run_after_any_parser() {
        #[derive(Typed, Default, Debug, PartialEq)]
        struct Trimmed {
            name: String,
        }

        super::set_on_deserialized::<Trimmed>(|t| t.name = t.name.trim().into());
        let back: Trimmed = from_jsv(r#"{name:"  x  "}"#).unwrap().unwrap();
        assert_eq!(back.name, "x");
        super::clear::<Trimmed>();
    }
}
