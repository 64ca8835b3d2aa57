use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::TypeMeta;

/// Generate `TypePath` and `Typed` for `#[jsv(opaque)]`.
///
/// The type is written through `Display` and read through `FromStr`.
pub(crate) fn impl_opaque(meta: &TypeMeta) -> TokenStream {
    let info_ = crate::path::info_(meta.vc_jsv_path());

    let info = quote! {
        #info_::TypeInfo::Opaque(#info_::OpaqueInfo::new::<Self>())
    };

    let type_path_impl = super::impl_trait_type_path(meta);
    let typed_impl = super::impl_trait_typed(meta, info);

    quote! {
        #type_path_impl
        #typed_impl
    }
}
