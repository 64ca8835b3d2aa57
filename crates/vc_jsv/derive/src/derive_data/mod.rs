//! Provide some tools for parsing the derive input.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod type_meta;
mod type_shape;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, TypeAttributes};
pub(crate) use type_meta::TypeMeta;
pub(crate) use type_shape::{EnumVariant, StructField, TypeDerive, TypeShape};
