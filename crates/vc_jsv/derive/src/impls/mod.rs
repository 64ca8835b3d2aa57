// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod enum_kind;
mod opaque_kind;
mod struct_kind;
mod trait_type_path;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

use auto_register::get_auto_register_impl;
use enum_kind::impl_enum;
use opaque_kind::impl_opaque;
use struct_kind::impl_struct;
use trait_type_path::impl_trait_type_path;
use trait_typed::impl_trait_typed;

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{TypeDerive, TypeShape};

/// Generate every impl for a parsed `#[derive(Typed)]` input.
pub(crate) fn match_typed_impls(derive: &TypeDerive) -> TokenStream {
    let meta = &derive.meta;

    let kind_impls = match &derive.shape {
        TypeShape::Struct(fields) => impl_struct(meta, fields),
        TypeShape::Enum(variants) => impl_enum(meta, variants),
        TypeShape::Opaque => impl_opaque(meta),
    };

    let auto_register = get_auto_register_impl(meta);

    quote! {
        #kind_impls
        #auto_register
    }
}
