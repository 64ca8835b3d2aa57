use proc_macro2::TokenStream;

use crate::derive_data::TypeMeta;

/// Generate the `inventory` submission for `#[jsv(auto_register)]` and
/// `#[jsv(implements(..))]`.
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(meta: &TypeMeta) -> TokenStream {
    use quote::{quote, quote_spanned};

    let attrs = meta.attrs();
    if attrs.auto_register.is_none() && attrs.implements.is_empty() {
        return crate::utils::empty();
    }
    // Invalid for generic types.
    if meta.impl_with_generic() {
        return crate::utils::empty();
    }

    let vc_jsv_path = meta.vc_jsv_path();
    let auto_register_ = crate::path::auto_register_(vc_jsv_path);
    let type_registry_ = crate::path::type_registry_(vc_jsv_path);
    let real_ident = meta.real_ident();

    let register_self = attrs.auto_register.map(|span| {
        quote_spanned! { span =>
            registry.register::<#real_ident>();
        }
    });

    let register_implementors = attrs.implements.iter().map(|trait_path| {
        quote! {
            registry.register_implementor::<::std::boxed::Box<dyn #trait_path>, #real_ident>(
                |value: #real_ident| -> ::std::boxed::Box<dyn #trait_path> {
                    ::std::boxed::Box::new(value)
                },
            );
        }
    });

    quote! {
        const _: () = {
            fn __register(registry: &mut #type_registry_) {
                #register_self
                #(#register_implementors)*
            }

            #auto_register_::inventory::submit! {
                #auto_register_::__AutoRegisterFunc(__register)
            }
        };
    }
}

/// Generate the `inventory` submission for `#[jsv(auto_register)]` and
/// `#[jsv(implements(..))]`.
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &TypeMeta) -> TokenStream {
    crate::utils::empty()
}
