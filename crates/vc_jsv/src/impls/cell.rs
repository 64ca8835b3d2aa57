//! Containers for static storage of type information.
//!
//! This is usually used to implement [`Typed`](crate::info::Typed) and
//! [`TypePath`](crate::info::TypePath).
//!
//! ## NonGenericTypeInfoCell
//!
//! For non generic types, [`NonGenericTypeInfoCell`] stores one [`TypeInfo`]
//! in a [`OnceLock`].
//!
//! ## GenericTypeCell
//!
//! A `static CELL` inside a generic function is shared by every
//! instantiation, so [`GenericTypeInfoCell`] and [`GenericTypePathCell`] keep
//! a [`TypeIdMap`] behind a [`RwLock`] and leak one value per type.

use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use vc_utils::TypeIdMap;

use crate::info::TypeInfo;

mod sealed {
    use super::TypeInfo;
    use alloc::string::String;
    pub trait TypedProperty: 'static {}

    impl TypedProperty for String {}
    impl TypedProperty for TypeInfo {}
}

use sealed::TypedProperty;

// -----------------------------------------------------------------------------
// NonGenericTypeCell

/// Static storage for a non-generic type's [`TypeInfo`].
pub struct NonGenericTypeCell<T: TypedProperty>(OnceLock<T>);

/// See [`NonGenericTypeCell`].
pub type NonGenericTypeInfoCell = NonGenericTypeCell<TypeInfo>;

impl<T: TypedProperty> NonGenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored value, initializing it with `f` on first access.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericTypeCell

/// Static storage shared by every instantiation of a generic type.
pub struct GenericTypeCell<T: TypedProperty>(RwLock<TypeIdMap<&'static T>>);

/// Stores one [`TypeInfo`] per instantiation.
pub type GenericTypeInfoCell = GenericTypeCell<TypeInfo>;

/// Stores one type path (or name) per instantiation.
pub type GenericTypePathCell = GenericTypeCell<String>;

impl<T: TypedProperty> GenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the value stored for `G`, initializing it with `f` on first
    /// access.
    ///
    /// `f` runs without holding the lock, so it may recurse into this cell
    /// for nested instantiations.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> T) -> &T {
        // Separate to reduce code compilation times
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> T) -> &T {
        match self.get_by_type_id(type_id) {
            Some(info) => info,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&T> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: T) -> &T {
        self.0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || Box::leak(Box::new(value)))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{GenericTypePathCell, NonGenericTypeInfoCell};
    use crate::info::{PrimitiveInfo, PrimitiveKind, TypeInfo};

    #[test]
    fn generic_cell_keeps_one_value_per_type() {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();

        let a = CELL.get_or_insert::<u8>(|| "a".into());
        let b = CELL.get_or_insert::<u16>(|| "b".into());
        let again = CELL.get_or_insert::<u8>(|| unreachable!());

        assert_eq!(a, "a");
        assert_eq!(b, "b");
        assert!(core::ptr::eq(a, again));
    }

    #[test]
    fn non_generic_cell_initializes_once() {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();

        let first = CELL.get_or_init(|| {
            TypeInfo::Primitive(PrimitiveInfo::new::<bool>(PrimitiveKind::Bool))
        });
        let second = CELL.get_or_init(|| unreachable!());
        assert!(core::ptr::eq(first, second));
    }
}
