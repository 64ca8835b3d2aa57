use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;
use core::fmt::{Display, Write};
use core::str::FromStr;

use crate::info::{DefaultFn, Type, TypePath};
use crate::{Error, Result};

/// Writes an erased value as text.
pub type ToTextFn = fn(&dyn Any, &mut String);

/// Builds a boxed value from text.
pub type FromTextFn = fn(&str) -> Result<Box<dyn Any>>;

/// Descriptor of a type written through its own string form.
///
/// The text is a single scalar: JSON quotes it, JSV quotes it only when it
/// contains structural characters.
#[derive(Debug, Clone)]
pub struct OpaqueInfo {
    ty: Type,
    to_text: ToTextFn,
    from_text: FromTextFn,
    default: Option<DefaultFn>,
}

impl OpaqueInfo {
    /// Creates the descriptor of `T` from its [`Display`] and [`FromStr`] impls.
    pub fn new<T>() -> Self
    where
        T: TypePath + Display + FromStr,
        T::Err: Display,
    {
        Self {
            ty: Type::of::<T>(),
            to_text: display_text::<T>,
            from_text: from_str_text::<T>,
            default: None,
        }
    }

    /// Creates the descriptor of `T` from explicit conversions.
    pub fn with_fns<T: TypePath>(to_text: ToTextFn, from_text: FromTextFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            to_text,
            from_text,
            default: None,
        }
    }

    /// Sets the value used for empty list slots and missing tuple fields.
    #[inline]
    pub fn with_default(mut self, default: DefaultFn) -> Self {
        self.default = Some(default);
        self
    }

    crate::info::impl_type_fn!(ty);

    #[inline]
    pub fn to_text(&self, value: &dyn Any, out: &mut String) {
        (self.to_text)(value, out);
    }

    #[inline]
    pub fn from_text(&self, text: &str) -> Result<Box<dyn Any>> {
        (self.from_text)(text)
    }

    #[inline]
    pub fn default_fn(&self) -> Option<DefaultFn> {
        self.default
    }
}

fn display_text<T: Display + Any>(value: &dyn Any, out: &mut String) {
    if let Some(value) = value.downcast_ref::<T>() {
        // Writing into a `String` cannot fail.
        let _ = write!(out, "{value}");
    }
}

fn from_str_text<T>(text: &str) -> Result<Box<dyn Any>>
where
    T: TypePath + FromStr,
    T::Err: Display,
{
    match text.parse::<T>() {
        Ok(value) => Ok(Box::new(value)),
        Err(e) => Err(Error::InvalidValue {
            expected: T::type_name(),
            text: alloc::format!("{text} ({e})"),
        }),
    }
}
