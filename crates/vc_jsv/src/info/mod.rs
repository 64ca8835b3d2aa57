//! Static type descriptors.
//!
//! Every serializable type exposes one immutable [`TypeInfo`] through
//! [`Typed::type_info`]. The descriptor names the shape of the type (scalar,
//! option, enum, list, map, tuple, struct, opaque, dynamic or abstract) and
//! carries type-erased function pointers over `&dyn Any`, so the dispatch
//! engine can build writers and parsers for any type without being generic
//! over it.
//!
//! Nested types are referenced through [`InfoFn`] rather than
//! `&'static TypeInfo`, which lets recursive types describe themselves.
//!
//! ```
//! use vc_jsv::info::{Typed, TypeKind};
//!
//! let info = <Vec<Option<u8>> as Typed>::type_info();
//! assert_eq!(info.kind(), TypeKind::List);
//! let item = (info.as_list().unwrap().item())();
//! assert_eq!(item.kind(), TypeKind::Option);
//! ```

// -----------------------------------------------------------------------------
// Modules

mod abstract_info;
mod enum_info;
mod list_info;
mod map_info;
mod opaque_info;
mod option_info;
mod primitive_info;
mod struct_info;
mod tuple_info;
mod type_info;
mod type_path;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use abstract_info::{AbstractInfo, AsReflectFn, DynamicInfo};
pub use enum_info::{EnumInfo, VariantInfo};
pub use list_info::{ForEachItemFn, FromItemsFn, ListInfo, ListKind};
pub use map_info::{ForEachEntryFn, FromEntriesFn, MapInfo};
pub use opaque_info::{FromTextFn, OpaqueInfo, ToTextFn};
pub use option_info::OptionInfo;
pub use primitive_info::{PrimitiveInfo, PrimitiveKind};
pub use struct_info::{GetMemberFn, MemberInfo, SetMemberFn, StructInfo};
pub use struct_info::{OnDeserializedFn, OnDeserializingFn};
pub use tuple_info::{TupleInfo, TupleKind};
pub use type_info::{TypeInfo, TypeKind, TypeKindError};
pub use type_path::{Type, TypePath, TypePathTable};
pub use typed::Typed;

pub(crate) use type_path::impl_type_fn;

use alloc::boxed::Box;
use core::any::Any;

// -----------------------------------------------------------------------------
// Erased function signatures

/// Lazily returns the descriptor of a nested type.
pub type InfoFn = fn() -> &'static TypeInfo;

/// Builds the default value of a type.
pub type DefaultFn = fn() -> Box<dyn Any>;

/// Tests an erased value against a predicate.
pub type TestFn = fn(&dyn Any) -> bool;

/// Returns the [`InfoFn`] of `T`.
#[inline(always)]
pub const fn info_of<T: Typed>() -> InfoFn {
    T::type_info
}

/// Builds `T::default()` behind a `Box<dyn Any>`.
pub fn default_of<T: Default + Any>() -> Box<dyn Any> {
    Box::new(T::default())
}

/// Returns `true` if the erased value is a `T` equal to `T::default()`.
pub fn is_default_of<T: Default + PartialEq + Any>(value: &dyn Any) -> bool {
    value
        .downcast_ref::<T>()
        .is_some_and(|value| *value == T::default())
}
