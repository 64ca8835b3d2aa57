use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericParam, Generics, Ident, WhereClause, parse_quote};

use super::TypeAttributes;
use crate::path::fp::{SendFP, SyncFP};

/// Everything about the derived type except its fields.
pub(crate) struct TypeMeta<'a> {
    vc_jsv_path: syn::Path,
    attrs: TypeAttributes,
    ident: &'a Ident,
    generics: &'a Generics,
}

impl<'a> TypeMeta<'a> {
    pub fn new(attrs: TypeAttributes, ident: &'a Ident, generics: &'a Generics) -> syn::Result<Self> {
        if let Some(param) = generics.lifetimes().next() {
            return Err(syn::Error::new_spanned(
                param,
                "`Typed` cannot be derived for types with lifetime parameters",
            ));
        }
        Ok(Self {
            vc_jsv_path: crate::path::vc_jsv(),
            attrs,
            ident,
            generics,
        })
    }

    #[inline]
    pub fn vc_jsv_path(&self) -> &syn::Path {
        &self.vc_jsv_path
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn real_ident(&self) -> &Ident {
        self.ident
    }

    /// Returns `true` if the type has type or const parameters.
    #[inline]
    pub fn impl_with_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }

    /// Splits the generics for an impl block.
    ///
    /// Every type parameter gets `extra` plus `Send + Sync`, so values of
    /// the type can be held as `dyn Reflect`.
    pub fn split_generics(&self, extra: TokenStream) -> (TokenStream, TokenStream, WhereClause) {
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();
        let mut where_clause = where_clause.cloned().unwrap_or_else(|| parse_quote!(where));

        for param in &self.generics.params {
            if let GenericParam::Type(param) = param {
                let ident = &param.ident;
                where_clause
                    .predicates
                    .push(parse_quote!(#ident: #extra + #SendFP + #SyncFP));
            }
        }

        (quote!(#impl_generics), quote!(#ty_generics), where_clause)
    }

    /// The type path without generic arguments.
    pub fn base_path(&self) -> TokenStream {
        match &self.attrs.type_path {
            Some(lit) => quote!(#lit),
            None => {
                let ident = self.ident.to_string();
                quote!(::core::concat!(::core::module_path!(), "::", #ident))
            }
        }
    }

    /// The type name without generic arguments.
    pub fn base_name(&self) -> String {
        match &self.attrs.type_path {
            Some(lit) => {
                let value = lit.value();
                match value.rsplit_once("::") {
                    Some((_, name)) => name.to_owned(),
                    None => value,
                }
            }
            None => self.ident.to_string(),
        }
    }

    /// The module of the type, `None` for a custom path without one.
    pub fn module_path(&self) -> Option<TokenStream> {
        match &self.attrs.type_path {
            Some(lit) => {
                let value = lit.value();
                let (module, _) = value.rsplit_once("::")?;
                Some(quote!(#module))
            }
            None => Some(quote!(::core::module_path!())),
        }
    }

    /// Type and const parameters in declaration order, `true` for const.
    pub fn generic_args(&self) -> Vec<(&Ident, bool)> {
        self.generics
            .params
            .iter()
            .filter_map(|param| match param {
                GenericParam::Type(param) => Some((&param.ident, false)),
                GenericParam::Const(param) => Some((&param.ident, true)),
                GenericParam::Lifetime(_) => None,
            })
            .collect()
    }
}
