use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{EnumVariant, TypeMeta};
use crate::path::fp::{AnyFP, BoxFP, OptionFP};

/// Generate `TypePath` and `Typed` for an enum of unit variants.
///
/// Variant values are the discriminants, read with `Self::Variant as i64`,
/// so explicit discriminants are honored.
pub(crate) fn impl_enum(meta: &TypeMeta, variants: &[EnumVariant]) -> TokenStream {
    let info_ = crate::path::info_(meta.vc_jsv_path());

    if variants.is_empty() {
        return syn::Error::new_spanned(meta.real_ident(), "enums need at least one variant")
            .into_compile_error();
    }

    let variant_infos = variants.iter().map(|variant| {
        let ident = variant.ident;
        let name = variant.written_name(meta);
        quote!(#info_::VariantInfo::new(#name, Self::#ident as i64))
    });

    let index_arms = variants.iter().enumerate().map(|(index, variant)| {
        let ident = variant.ident;
        quote!(Self::#ident => #index)
    });

    let from_index_arms = variants.iter().enumerate().map(|(index, variant)| {
        let ident = variant.ident;
        quote!(#index => #BoxFP::new(Self::#ident))
    });

    let info = quote! {
        #info_::TypeInfo::Enum(#info_::EnumInfo::new::<Self>(
            &[#(#variant_infos),*],
            |value| {
                #OptionFP::Some(match value.downcast_ref::<Self>()? {
                    #(#index_arms,)*
                })
            },
            |index| {
                let value: #BoxFP<dyn #AnyFP> = match index {
                    #(#from_index_arms,)*
                    _ => return #OptionFP::None,
                };
                #OptionFP::Some(value)
            },
        ))
    };

    let type_path_impl = super::impl_trait_type_path(meta);
    let typed_impl = super::impl_trait_typed(meta, info);

    quote! {
        #type_path_impl
        #typed_impl
    }
}
