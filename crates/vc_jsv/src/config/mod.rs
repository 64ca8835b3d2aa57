//! Global and scoped serialization settings.
//!
//! [`Config::current`] returns the innermost [`ConfigScope`] of the calling
//! thread, or the global config. Entry points read it once per call and
//! thread it through every write and parse function, so cached codecs never
//! capture a policy.
//!
//! ```
//! use vc_jsv::config::{Config, TextCase};
//!
//! {
//!     let _scope = Config::scope_from_str("eccn,inv").unwrap();
//!     assert_eq!(Config::current().text_case, TextCase::CamelCase);
//!     assert!(Config::current().include_null_values);
//! }
//! assert!(!Config::current().include_null_values);
//! ```

// -----------------------------------------------------------------------------
// Modules

mod scope;

// -----------------------------------------------------------------------------
// Exports

pub use scope::ConfigScope;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use std::sync::LazyLock;

use arc_swap::ArcSwap;
use bitflags::bitflags;

use crate::format::Escape;
use crate::info::{StructInfo, TypeInfo};
use crate::registry::TYPE_TAG;
use crate::time::DateTime;
use crate::value::Value;
use crate::{Error, Result};

// -----------------------------------------------------------------------------
// Policy enums

/// How dates are written, and which numeric forms are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DateHandler {
    /// `\/Date(ms+hhmm)\/`, with the local offset for non-UTC values.
    #[default]
    TimestampOffset,
    /// Like [`TimestampOffset`](Self::TimestampOffset), and a written offset
    /// is read back as local time.
    DcjsCompatible,
    /// Round-trip ISO 8601 with a 7-digit fraction.
    Iso8601,
    /// `yyyy-MM-dd`.
    Iso8601DateOnly,
    /// `yyyy-MM-dd HH:mm:ss`.
    Iso8601DateTime,
    /// `ddd, dd MMM yyyy HH:mm:ss GMT`.
    Rfc1123,
    /// Whole seconds since the Unix epoch, as a bare number.
    UnixTime,
    /// Milliseconds since the Unix epoch, as a bare number.
    UnixTimeMs,
}

/// How time spans are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TimeSpanHandler {
    /// XSD duration, `P1DT2H`.
    #[default]
    DurationFormat,
    /// `[-][d.]hh:mm:ss[.fffffff]`.
    StandardFormat,
}

/// How member names are cased when written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextCase {
    /// The declared name.
    #[default]
    Default,
    PascalCase,
    CamelCase,
    SnakeCase,
}

/// How member names are matched when read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PropertyConvention {
    /// Case-insensitive match only.
    #[default]
    Strict,
    /// Also ignore `-` and `_`.
    Lenient,
}

bitflags! {
    /// Numeric types a loosely-typed number may be narrowed to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ParseAsType: u16 {
        const BOOL   = 1 << 1;
        const BYTE   = 1 << 2;
        const SBYTE  = 1 << 3;
        const INT16  = 1 << 4;
        const UINT16 = 1 << 5;
        const INT32  = 1 << 6;
        const UINT32 = 1 << 7;
        const INT64  = 1 << 8;
        const UINT64 = 1 << 9;
        const SINGLE = 1 << 10;
        const DOUBLE = 1 << 11;

        const INTEGERS = Self::BYTE.bits()
            | Self::SBYTE.bits()
            | Self::INT16.bits()
            | Self::UINT16.bits()
            | Self::INT32.bits()
            | Self::UINT32.bits()
            | Self::INT64.bits()
            | Self::UINT64.bits();
    }
}

// -----------------------------------------------------------------------------
// Callbacks

/// Decides whether a resolved runtime type may be instantiated.
pub type AllowRuntimeTypeFn = Arc<dyn Fn(&TypeInfo) -> bool + Send + Sync>;

/// Resolves a `__type` tag to a descriptor before the registry is consulted.
pub type TypeFinderFn = Arc<dyn Fn(&str) -> Option<&'static TypeInfo> + Send + Sync>;

/// Receives a member that failed to deserialize: the instance, the member
/// name, the raw text and the error.
pub type OnDeserializationErrorFn = Arc<dyn Fn(&dyn Any, &str, &str, &Error) + Send + Sync>;

/// Parses a loosely-typed scalar before the built-in rules run.
pub type ParsePrimitiveFn = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;

/// Substitutes a value for a date that matched no known encoding.
pub type OnDateParseErrorFn = Arc<dyn Fn(&str, Error) -> Result<DateTime> + Send + Sync>;

// -----------------------------------------------------------------------------
// Config

/// The serialization settings.
///
/// Cheap to clone: the callbacks are reference counted.
#[derive(Clone)]
pub struct Config {
    pub date_handler: DateHandler,
    pub time_span_handler: TimeSpanHandler,
    pub text_case: TextCase,
    pub property_convention: PropertyConvention,
    /// Write `null` members of structs.
    pub include_null_values: bool,
    /// Write `null` values of maps.
    pub include_null_values_in_dictionaries: bool,
    /// Write enum members equal to their default variant.
    pub include_default_enums: bool,
    /// Skip members equal to their type's default value.
    pub exclude_default_values: bool,
    /// Write `__type` for every struct.
    pub include_type_info: bool,
    /// Never write `__type`.
    pub exclude_type_info: bool,
    /// Turn member failures into errors instead of skipping them.
    pub throw_on_error: bool,
    pub treat_enum_as_integer: bool,
    pub skip_date_time_conversion: bool,
    pub always_use_utc: bool,
    pub assume_utc: bool,
    pub append_utc_offset: bool,
    /// Write non-ASCII characters as `\uXXXX` in JSON.
    pub escape_unicode: bool,
    /// Write `<`, `>`, `&`, `=` and `'` as `\uXXXX` in JSON.
    pub escape_html_chars: bool,
    /// A `chrono` layout dates are written with instead of the date handler
    /// form, and tried first when reading.
    pub date_time_format: Option<String>,
    /// The member carrying the runtime type of a struct.
    pub type_attr: String,
    /// Type paths of members left out of written structs.
    pub exclude_types: Vec<String>,
    /// `Type.member` references left out of written structs. `Type` is the
    /// type name or the full type path.
    pub exclude_property_references: Vec<String>,
    /// Read nested maps of a loosely-typed slot as [`Value::Map`].
    pub convert_object_types_into_string_dictionary: bool,
    /// Read scalars of a loosely-typed slot as bools and numbers.
    pub try_to_parse_primitive_type_values: bool,
    /// Read numeric scalars of a loosely-typed slot as numbers.
    pub try_to_parse_numeric_type: bool,
    pub parse_primitive_integer_types: ParseAsType,
    pub parse_primitive_floating_point_types: ParseAsType,
    /// Nesting depth past which values are not written or read.
    pub max_depth: usize,
    /// Full type paths trusted in `__type` tags.
    pub allow_runtime_types: Vec<String>,
    /// Module path prefixes trusted in `__type` tags.
    pub allow_runtime_namespaces: Vec<String>,
    /// Marker names trusted in `__type` tags.
    pub allow_runtime_markers: Vec<String>,
    pub allow_runtime_type: Option<AllowRuntimeTypeFn>,
    /// Trust registered implementors of an abstract declared type.
    pub allow_runtime_interfaces: bool,
    pub type_finder: Option<TypeFinderFn>,
    pub on_deserialization_error: Option<OnDeserializationErrorFn>,
    pub parse_primitive_fn: Option<ParsePrimitiveFn>,
    pub on_date_parse_error: Option<OnDateParseErrorFn>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            date_handler: DateHandler::TimestampOffset,
            time_span_handler: TimeSpanHandler::DurationFormat,
            text_case: TextCase::Default,
            property_convention: PropertyConvention::Strict,
            include_null_values: false,
            include_null_values_in_dictionaries: false,
            include_default_enums: true,
            exclude_default_values: false,
            include_type_info: false,
            exclude_type_info: false,
            throw_on_error: false,
            treat_enum_as_integer: false,
            skip_date_time_conversion: false,
            always_use_utc: false,
            assume_utc: false,
            append_utc_offset: false,
            escape_unicode: true,
            escape_html_chars: false,
            date_time_format: None,
            type_attr: String::from(TYPE_TAG),
            exclude_types: Vec::new(),
            exclude_property_references: Vec::new(),
            convert_object_types_into_string_dictionary: false,
            try_to_parse_primitive_type_values: false,
            try_to_parse_numeric_type: false,
            parse_primitive_integer_types: ParseAsType::INTEGERS,
            parse_primitive_floating_point_types: ParseAsType::DOUBLE,
            max_depth: 50,
            allow_runtime_types: Vec::new(),
            allow_runtime_namespaces: Vec::new(),
            allow_runtime_markers: alloc::vec![String::from("RuntimeSerializable")],
            allow_runtime_type: None,
            allow_runtime_interfaces: true,
            type_finder: None,
            on_deserialization_error: None,
            parse_primitive_fn: None,
            on_date_parse_error: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("date_handler", &self.date_handler)
            .field("time_span_handler", &self.time_span_handler)
            .field("text_case", &self.text_case)
            .field("property_convention", &self.property_convention)
            .field("include_null_values", &self.include_null_values)
            .field("date_time_format", &self.date_time_format)
            .field("type_attr", &self.type_attr)
            .field("include_type_info", &self.include_type_info)
            .field("exclude_type_info", &self.exclude_type_info)
            .field("throw_on_error", &self.throw_on_error)
            .field("max_depth", &self.max_depth)
            .field("allow_runtime_types", &self.allow_runtime_types)
            .field("allow_runtime_namespaces", &self.allow_runtime_namespaces)
            .field("allow_runtime_markers", &self.allow_runtime_markers)
            .finish_non_exhaustive()
    }
}

static GLOBAL: LazyLock<ArcSwap<Config>> =
    LazyLock::new(|| ArcSwap::from_pointee(Config::default()));

impl Config {
    /// Returns the process-wide config.
    #[inline]
    pub fn global() -> Arc<Config> {
        GLOBAL.load_full()
    }

    /// Replaces the process-wide config.
    pub fn set_global(config: Config) {
        GLOBAL.store(Arc::new(config));
    }

    /// Edits the process-wide config in place.
    ///
    /// `f` may run more than once if another thread updates concurrently.
    pub fn update_global(f: impl Fn(&mut Config)) {
        GLOBAL.rcu(|current| {
            let mut next = Config::clone(current);
            f(&mut next);
            next
        });
    }

    /// Restores the process-wide config to its defaults.
    pub fn reset_global() {
        Self::set_global(Config::default());
    }

    /// Returns the config in effect on this thread.
    pub fn current() -> Arc<Config> {
        scope::innermost().unwrap_or_else(Self::global)
    }

    /// Makes `self` the config of this thread until the guard drops.
    #[inline]
    pub fn scope(self) -> ConfigScope {
        ConfigScope::push(Arc::new(self))
    }

    /// Scopes a copy of the current config edited by `f`.
    pub fn scope_with(f: impl FnOnce(&mut Config)) -> ConfigScope {
        let mut config = Config::clone(&Self::current());
        f(&mut config);
        config.scope()
    }

    /// Scopes a copy of the current config edited by a compact option
    /// string such as `"dh:iso8601,eccn,inv"`.
    ///
    /// Keys are short aliases or full names, case and `_` insensitive. A
    /// bare key enables a flag, `key:false` or `key:0` disables it.
    pub fn scope_from_str(text: &str) -> Result<ConfigScope> {
        let mut config = Config::clone(&Self::current());
        scope::apply(&mut config, text)?;
        Ok(config.scope())
    }

    /// The escapes JSON strings are written with.
    pub fn escape(&self) -> Escape {
        let mut escape = Escape::empty();
        escape.set(Escape::UNICODE, self.escape_unicode);
        escape.set(Escape::HTML, self.escape_html_chars);
        escape
    }

    /// Returns `true` if `member` of `owner`, holding a `member_type`, is
    /// left out of written structs.
    pub fn is_member_excluded(&self, owner: &StructInfo, member: &str, member_type: &TypeInfo) -> bool {
        let excluded_type = self
            .exclude_types
            .iter()
            .any(|t| t == member_type.type_path() || t == member_type.type_name());
        if excluded_type {
            return true;
        }
        self.exclude_property_references.iter().any(|reference| {
            reference
                .rsplit_once('.')
                .is_some_and(|(ty, name)| {
                    name == member && (ty == owner.type_name() || ty == owner.type_path())
                })
        })
    }

    /// Returns `true` if member names are matched ignoring `-` and `_`.
    #[inline]
    pub fn is_lenient(&self) -> bool {
        self.property_convention == PropertyConvention::Lenient
    }
}

// -----------------------------------------------------------------------------
// Tests
