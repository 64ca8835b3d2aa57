use alloc::boxed::Box;
use core::any::Any;

use crate::info::{DefaultFn, InfoFn, Type, Typed};

/// Descriptor of `Option<T>`, the nullable wrapper.
#[derive(Debug, Clone)]
pub struct OptionInfo {
    ty: Type,
    some: InfoFn,
    get: fn(&dyn Any) -> Option<&dyn Any>,
    wrap: fn(Box<dyn Any>) -> Option<Box<dyn Any>>,
    none: DefaultFn,
}

impl OptionInfo {
    pub fn new<T: Typed>() -> Self {
        Self {
            ty: Type::of::<Option<T>>(),
            some: T::type_info,
            get: option_get::<T>,
            wrap: option_wrap::<T>,
            none: option_none::<T>,
        }
    }

    crate::info::impl_type_fn!(ty);

    /// Returns the descriptor of the inner type.
    #[inline]
    pub fn some(&self) -> InfoFn {
        self.some
    }

    /// Returns the inner value, `None` for `None` or a foreign value.
    #[inline]
    pub fn get<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.get)(value)
    }

    /// Wraps a boxed `T` into a boxed `Some(T)`.
    #[inline]
    pub fn wrap(&self, value: Box<dyn Any>) -> Option<Box<dyn Any>> {
        (self.wrap)(value)
    }

    #[inline]
    pub fn none(&self) -> Box<dyn Any> {
        (self.none)()
    }
}

fn option_get<T: Any>(value: &dyn Any) -> Option<&dyn Any> {
    value
        .downcast_ref::<Option<T>>()?
        .as_ref()
        .map(|v| v as &dyn Any)
}

fn option_wrap<T: Any>(value: Box<dyn Any>) -> Option<Box<dyn Any>> {
    let value = value.downcast::<T>().ok()?;
    Some(Box::new(Some(*value)))
}

fn option_none<T: Any>() -> Box<dyn Any> {
    Box::new(None::<T>)
}
