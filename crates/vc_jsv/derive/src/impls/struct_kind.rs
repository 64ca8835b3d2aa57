use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{StructField, TypeMeta};
use crate::path::fp::{AnyFP, BoxFP, OptionFP};

/// Generate `TypePath` and `Typed` for a struct with named fields.
pub(crate) fn impl_struct(meta: &TypeMeta, fields: &[StructField]) -> TokenStream {
    let vc_jsv_path = meta.vc_jsv_path();
    let info_ = crate::path::info_(vc_jsv_path);

    let members = fields
        .iter()
        .filter(|field| field.attrs.skip.is_none())
        .map(|field| member_tokens(meta, field));

    let attrs = meta.attrs();

    let with_lenient = attrs.lenient.map(|_| quote!(.with_lenient(true)));

    let with_markers = (!attrs.markers.is_empty()).then(|| {
        let markers = &attrs.markers;
        quote!(.with_markers(&[#(#markers),*]))
    });

    let with_on_deserializing = attrs.on_deserializing.as_ref().map(|path| {
        quote! {
            .with_on_deserializing(|instance, name, text| {
                let instance = instance.downcast_mut::<Self>()?;
                #path(instance, name, text)
            })
        }
    });

    let with_on_deserialized = attrs.on_deserialized.as_ref().map(|path| {
        quote! {
            .with_on_deserialized(|instance| {
                if let #OptionFP::Some(instance) = instance.downcast_mut::<Self>() {
                    #path(instance);
                }
            })
        }
    });

    let info = quote! {
        #info_::TypeInfo::Struct(
            #info_::StructInfo::new::<Self>(&[
                #(#members),*
            ])
            #with_lenient
            #with_markers
            #with_on_deserializing
            #with_on_deserialized
        )
    };

    let type_path_impl = super::impl_trait_type_path(meta);
    let typed_impl = super::impl_trait_typed(meta, info);

    quote! {
        #type_path_impl
        #typed_impl
    }
}

/// `MemberInfo::new::<T>(..)` for one field.
fn member_tokens(meta: &TypeMeta, field: &StructField) -> TokenStream {
    let info_ = crate::path::info_(meta.vc_jsv_path());
    let ident = field.ident;
    let ty = field.ty;
    let field_name = ident.to_string();
    let field_name = field_name.trim_start_matches("r#");

    let with_name = field
        .written_name(meta)
        .map(|name| quote!(.with_name(#name)));

    let with_should_serialize = field.attrs.should_serialize.as_ref().map(|path| {
        quote! {
            .with_should_serialize(|instance| {
                instance.downcast_ref::<Self>().is_some_and(#path)
            })
        }
    });

    quote! {
        #info_::MemberInfo::new::<#ty>(
            #field_name,
            |instance| {
                let instance = instance.downcast_ref::<Self>()?;
                let member: &dyn #AnyFP = &instance.#ident;
                #OptionFP::Some(member)
            },
            |instance, value: #BoxFP<dyn #AnyFP>| {
                let (#OptionFP::Some(instance), ::core::result::Result::Ok(value)) =
                    (instance.downcast_mut::<Self>(), value.downcast::<#ty>())
                else {
                    return false;
                };
                instance.#ident = *value;
                true
            },
        )
        #with_name
        #with_should_serialize
    }
}

