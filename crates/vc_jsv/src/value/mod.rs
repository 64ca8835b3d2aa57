//! The loosely-typed object slot.
//!
//! A [`Value`] member reads whatever the text holds: a typed object when a
//! `__type` tag names an allowed type, nested maps and lists, narrowed
//! numbers and dates when the config asks for them, and a plain string
//! otherwise. See [`parse_number`] and [`parse_primitive`] for the scalar
//! rules.
//!
//! ```
//! use vc_jsv::value::Value;
//!
//! let _scope = vc_jsv::config::Config::scope_from_str("ttpptv").unwrap();
//! let value: Value = vc_jsv::from_json("300").unwrap().unwrap();
//! assert_eq!(value, Value::U16(300));
//! ```

// -----------------------------------------------------------------------------
// Modules

mod number;

// -----------------------------------------------------------------------------
// Exports

pub use number::{parse_number, parse_primitive, parse_quoted_primitive};

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use uuid::Uuid;

use crate::Reflect;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{DynamicInfo, TypeInfo, TypePath, Typed};
use crate::time::DateTime;

// -----------------------------------------------------------------------------
// Value

/// A value whose type is decided by the text it is read from.
#[derive(Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    U8(u8),
    I8(i8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Guid(Uuid),
    DateTime(DateTime),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// A typed value read through its `__type` tag.
    Object(Box<dyn Reflect>),
}

impl Value {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns any integer that fits an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::U8(v) => Some(v.into()),
            Self::I8(v) => Some(v.into()),
            Self::I16(v) => Some(v.into()),
            Self::U16(v) => Some(v.into()),
            Self::I32(v) => Some(v.into()),
            Self::U32(v) => Some(v.into()),
            Self::I64(v) => Some(v),
            Self::U64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Returns any number as an `f64`, possibly losing precision.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::F32(v) => Some(v.into()),
            Self::F64(v) => Some(v),
            Self::U64(v) => Some(v as f64),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&dyn Reflect> {
        match self {
            Self::Object(v) => Some(&**v),
            _ => None,
        }
    }

    /// Returns the typed object if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_object()?.as_any().downcast_ref::<T>()
    }

    /// Returns the member `key` of a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.get(key)
    }
}

impl PartialEq for Value {
    /// Objects are equal when they have the same type and JSV text.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Guid(a), Self::Guid(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => {
                a.reflect_type_info().type_id() == b.reflect_type_info().type_id()
                    && crate::serializer::reflect_to_jsv(&**a)
                        == crate::serializer::reflect_to_jsv(&**b)
            }
            _ => false,
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from!(
    bool => Bool,
    u8 => U8,
    i8 => I8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    Uuid => Guid,
    DateTime => DateTime,
    Vec<Value> => List,
    BTreeMap<String, Value> => Map,
);

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// -----------------------------------------------------------------------------
// Typed

impl TypePath for Value {
    #[inline]
    fn type_path() -> &'static str {
        "vc_jsv::value::Value"
    }

    #[inline]
    fn type_name() -> &'static str {
        "Value"
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Value"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("vc_jsv::value")
    }
}

impl Typed for Value {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::Dynamic(DynamicInfo::new::<Self>(
                crate::info::default_of::<Self>,
                |value| value.downcast_ref::<Self>().is_none_or(Self::is_null),
            ))
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::vec;

    use super::Value;
    use crate::info::{TypeKind, Typed};

    #[test]
    fn accessors() {
        assert!(Value::default().is_null());
        assert_eq!(Value::from(7_u8).as_i64(), Some(7));
        assert_eq!(Value::from(u64::MAX).as_i64(), None);
        assert_eq!(Value::from(1.5_f32).as_f64(), Some(1.5));
        assert_eq!(Value::from("a").as_str(), Some("a"));
        assert_eq!(Value::from(None::<bool>), Value::Null);

        let map = Value::Map(BTreeMap::from([("k".into(), Value::from(vec![Value::Null]))]));
        assert_eq!(map.get("k").and_then(Value::as_list).map(<[_]>::len), Some(1));
    }

    #[test]
    fn objects_compare_by_type_and_text() {
        let a = Value::Object(Box::new(5_i32));
        assert_eq!(a, Value::Object(Box::new(5_i32)));
        assert_ne!(a, Value::Object(Box::new(5_i64)));
        assert_ne!(a, Value::I32(5));
        assert_eq!(a.downcast_ref::<i32>(), Some(&5));
    }

    #[test]
    fn dynamic_descriptor() {
        let info = Value::type_info();
        assert_eq!(info.kind(), TypeKind::Dynamic);
        assert!(info.is_null(&Value::Null));
        assert!(!info.is_null(&Value::Bool(false)));
        assert!(info.default_value().is_some_and(|v| v.is::<Value>()));
    }
}
