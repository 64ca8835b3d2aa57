//! Paths into `vc_jsv` used by the generated code.
//!
//! Only the crate path itself is resolved per invocation, see [`vc_jsv`].

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the access path to the `vc_jsv` crate from the invoking crate.
///
/// 1. For crates that depend on `vc_jsv`, `::vc_jsv` is returned.
/// 2. For crates that depend on the facade `vc_text`, `::vc_text::jsv` is returned.
/// 3. Otherwise `::vc_jsv`, which `vc_jsv` itself resolves through
///    `extern crate self as vc_jsv`.
///
/// Reading the manifest is relatively expensive, so the path is computed
/// once per derive and passed around.
pub(crate) fn vc_jsv() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_jsv"))
}

// -----------------------------------------------------------------------------
// Internal API

#[inline(always)]
pub(crate) fn info_(vc_jsv_path: &syn::Path) -> TokenStream {
    quote! { #vc_jsv_path::info }
}

#[inline(always)]
pub(crate) fn impls_(vc_jsv_path: &syn::Path) -> TokenStream {
    quote! { #vc_jsv_path::impls }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(vc_jsv_path: &syn::Path) -> TokenStream {
    quote! { #vc_jsv_path::__macro_exports::auto_register }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn type_registry_(vc_jsv_path: &syn::Path) -> TokenStream {
    quote! { #vc_jsv_path::registry::TypeRegistry }
}

// -----------------------------------------------------------------------------
// Fully qualified std paths

pub(crate) mod fp {
    use proc_macro2::TokenStream;
    use quote::{ToTokens, quote};

    macro_rules! fully_qualified {
        ($($name:ident => $path:path),* $(,)?) => {
            $(
                pub(crate) struct $name;

                impl ToTokens for $name {
                    fn to_tokens(&self, tokens: &mut TokenStream) {
                        quote!($path).to_tokens(tokens);
                    }
                }
            )*
        };
    }

    fully_qualified! {
        OptionFP => ::core::option::Option,
        BoxFP => ::std::boxed::Box,
        AnyFP => ::core::any::Any,
        SendFP => ::core::marker::Send,
        SyncFP => ::core::marker::Sync,
    }
}
