use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::info::{TypeInfo, Typed};

/// An object-safe view of any [`Typed`] value.
///
/// Values whose concrete type is only known at runtime are held as
/// `Box<dyn Reflect>`: the payload of [`Value::Object`](crate::value::Value)
/// and the implementors behind abstract slots.
///
/// Automatically implemented for every `Typed + Send + Sync` type.
///
/// # Examples
///
/// ```
/// use vc_jsv::Reflect;
///
/// let value: Box<dyn Reflect> = Box::new(7_u16);
/// assert_eq!(value.reflect_type_info().type_path(), "u16");
/// assert_eq!(value.as_any().downcast_ref::<u16>(), Some(&7));
/// ```
pub trait Reflect: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Returns the [`TypeInfo`] of the concrete type.
    fn reflect_type_info(&self) -> &'static TypeInfo;
}

impl<T: Typed + Send + Sync> Reflect for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        T::type_info()
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({})",
            self.reflect_type_info().type_name(),
            crate::serializer::reflect_to_jsv(self)
        )
    }
}
