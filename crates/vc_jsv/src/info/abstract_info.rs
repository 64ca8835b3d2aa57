use core::any::Any;

use crate::Reflect;
use crate::info::{DefaultFn, TestFn, Type, TypePath};

// -----------------------------------------------------------------------------
// AbstractInfo

/// Views the concrete value behind an erased `Box<dyn Trait>`.
pub type AsReflectFn = fn(&dyn Any) -> Option<&dyn Reflect>;

/// Descriptor of an abstract slot such as `Box<dyn Shape>`.
///
/// The concrete type is only known at runtime, so values are always written
/// with a type tag, and reading requires one. See
/// [`impl_abstract!`](crate::impl_abstract).
#[derive(Debug, Clone)]
pub struct AbstractInfo {
    ty: Type,
    as_reflect: AsReflectFn,
}

impl AbstractInfo {
    pub fn new<T: TypePath + ?Sized>(as_reflect: AsReflectFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            as_reflect,
        }
    }

    crate::info::impl_type_fn!(ty);

    #[inline]
    pub fn as_reflect<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn Reflect> {
        (self.as_reflect)(value)
    }
}

// -----------------------------------------------------------------------------
// DynamicInfo

/// Descriptor of the loosely-typed object slot, [`Value`](crate::value::Value).
#[derive(Debug, Clone)]
pub struct DynamicInfo {
    ty: Type,
    default: DefaultFn,
    is_null: TestFn,
}

impl DynamicInfo {
    pub fn new<T: TypePath>(default: DefaultFn, is_null: TestFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            default,
            is_null,
        }
    }

    crate::info::impl_type_fn!(ty);

    #[inline]
    pub fn default_fn(&self) -> DefaultFn {
        self.default
    }

    #[inline]
    pub fn is_null(&self, value: &dyn Any) -> bool {
        (self.is_null)(value)
    }
}
