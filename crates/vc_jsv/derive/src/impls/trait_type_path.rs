use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::TypeMeta;
use crate::path::fp::OptionFP;

/// Generate implementation codes for `TypePath`.
///
/// Generic types build `Name<A, B>` once per instantiation in a
/// `GenericTypePathCell`.
pub(crate) fn impl_trait_type_path(meta: &TypeMeta) -> TokenStream {
    let vc_jsv_path = meta.vc_jsv_path();
    let info_ = crate::path::info_(vc_jsv_path);
    let impls_ = crate::path::impls_(vc_jsv_path);

    let real_ident = meta.real_ident();
    let base_path = meta.base_path();
    let base_name = meta.base_name();
    let type_ident = real_ident.to_string();

    let module_path = match meta.module_path() {
        Some(module) => quote!(#OptionFP::Some(#module)),
        None => quote!(#OptionFP::None),
    };

    let (type_path, type_name) = if meta.impl_with_generic() {
        let args = |method: TokenStream| {
            let args = meta.generic_args().into_iter().map(|(ident, is_const)| {
                if is_const {
                    quote!(::std::string::ToString::to_string(&#ident))
                } else {
                    quote!(<#ident as #info_::TypePath>::#method().into())
                }
            });
            quote! {
                let args: ::std::vec::Vec<::std::string::String> = ::std::vec![#(#args),*];
                args.join(", ")
            }
        };
        let path_args = args(quote!(type_path));
        let name_args = args(quote!(type_name));
        (
            quote! {
                static CELL: #impls_::GenericTypePathCell = #impls_::GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    let args = { #path_args };
                    #impls_::concat(&[#base_path, "<", &args, ">"])
                })
            },
            quote! {
                static CELL: #impls_::GenericTypePathCell = #impls_::GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    let args = { #name_args };
                    #impls_::concat(&[#base_name, "<", &args, ">"])
                })
            },
        )
    } else {
        (quote!(#base_path), quote!(#base_name))
    };

    let (impl_generics, ty_generics, where_clause) =
        meta.split_generics(quote!(#info_::TypePath));

    quote! {
        impl #impl_generics #info_::TypePath for #real_ident #ty_generics #where_clause {
            fn type_path() -> &'static str {
                #type_path
            }

            fn type_name() -> &'static str {
                #type_name
            }

            #[inline]
            fn type_ident() -> &'static str {
                #type_ident
            }

            #[inline]
            fn module_path() -> #OptionFP<&'static str> {
                #module_path
            }
        }
    }
}
