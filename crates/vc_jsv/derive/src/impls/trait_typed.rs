use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::TypeMeta;

/// Generate implementation codes for `Typed`.
///
/// `info` is an expression evaluating to the `TypeInfo` of `Self`. It runs
/// once, inside a `NonGenericTypeInfoCell` or, for generic types, once per
/// instantiation inside a `GenericTypeInfoCell`.
pub(crate) fn impl_trait_typed(meta: &TypeMeta, info: TokenStream) -> TokenStream {
    let vc_jsv_path = meta.vc_jsv_path();
    let info_ = crate::path::info_(vc_jsv_path);
    let impls_ = crate::path::impls_(vc_jsv_path);
    let real_ident = meta.real_ident();

    let body = if meta.impl_with_generic() {
        quote! {
            static CELL: #impls_::GenericTypeInfoCell = #impls_::GenericTypeInfoCell::new();
            CELL.get_or_insert::<Self>(|| #info)
        }
    } else {
        quote! {
            static CELL: #impls_::NonGenericTypeInfoCell = #impls_::NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| #info)
        }
    };

    let (impl_generics, ty_generics, mut where_clause) =
        meta.split_generics(quote!(#info_::Typed));
    // Only structs may be generic.
    if meta.impl_with_generic() {
        where_clause
            .predicates
            .push(syn::parse_quote!(Self: ::core::default::Default));
    }

    quote! {
        impl #impl_generics #info_::Typed for #real_ident #ty_generics #where_clause {
            fn type_info() -> &'static #info_::TypeInfo {
                #body
            }
        }
    }
}
