use syn::{Data, DeriveInput, Fields, Ident, Type};

use super::{FieldAttributes, TypeAttributes, TypeMeta};

// -----------------------------------------------------------------------------
// Define

/// A named struct field.
pub(crate) struct StructField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
}

/// A unit variant.
pub(crate) struct EnumVariant<'a> {
    pub ident: &'a Ident,
    pub attrs: FieldAttributes,
}

pub(crate) enum TypeShape<'a> {
    /// A struct with named fields, or a unit struct.
    Struct(Vec<StructField<'a>>),
    /// An enum whose variants carry no data.
    Enum(Vec<EnumVariant<'a>>),
    /// `#[jsv(opaque)]`, written through `Display` and `FromStr`.
    Opaque,
}

/// The parsed input of `#[derive(Typed)]`.
pub(crate) struct TypeDerive<'a> {
    pub meta: TypeMeta<'a>,
    pub shape: TypeShape<'a>,
}

// -----------------------------------------------------------------------------
// Parse

impl<'a> TypeDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;

        let shape = if attrs.opaque.is_some() {
            attrs.deny_struct_only("opaque types")?;
            if !input.generics.params.is_empty() {
                return Err(syn::Error::new_spanned(
                    &input.generics,
                    "generic opaque types are not supported",
                ));
            }
            TypeShape::Opaque
        } else {
            match &input.data {
                Data::Struct(data) => match &data.fields {
                    Fields::Named(fields) => TypeShape::Struct(
                        fields
                            .named
                            .iter()
                            .map(|field| {
                                Ok(StructField {
                                    // Named fields always have an ident.
                                    ident: field.ident.as_ref().ok_or_else(|| {
                                        syn::Error::new_spanned(field, "expected a named field")
                                    })?,
                                    ty: &field.ty,
                                    attrs: FieldAttributes::parse_attrs(&field.attrs)?,
                                })
                            })
                            .collect::<syn::Result<_>>()?,
                    ),
                    Fields::Unit => TypeShape::Struct(Vec::new()),
                    Fields::Unnamed(fields) => {
                        return Err(syn::Error::new_spanned(
                            fields,
                            "tuple structs need `#[jsv(opaque)]`",
                        ));
                    }
                },
                Data::Enum(data) => {
                    attrs.deny_struct_only("enums")?;
                    if !input.generics.params.is_empty() {
                        return Err(syn::Error::new_spanned(
                            &input.generics,
                            "generic enums are not supported",
                        ));
                    }
                    TypeShape::Enum(
                        data.variants
                            .iter()
                            .map(|variant| {
                                if !matches!(variant.fields, Fields::Unit) {
                                    return Err(syn::Error::new_spanned(
                                        &variant.fields,
                                        "only unit variants are supported",
                                    ));
                                }
                                Ok(EnumVariant {
                                    ident: &variant.ident,
                                    attrs: FieldAttributes::parse_variant_attrs(&variant.attrs)?,
                                })
                            })
                            .collect::<syn::Result<_>>()?,
                    )
                }
                Data::Union(data) => {
                    return Err(syn::Error::new(
                        data.union_token.span,
                        "`Typed` cannot be derived for unions",
                    ));
                }
            }
        };

        let meta = TypeMeta::new(attrs, &input.ident, &input.generics)?;
        Ok(Self { meta, shape })
    }
}

impl StructField<'_> {
    /// The written name: the alias, the renamed field, or the field.
    pub fn written_name(&self, meta: &TypeMeta) -> Option<String> {
        if let Some(rename) = &self.attrs.rename {
            return Some(rename.value());
        }
        let rule = meta.attrs().rename_all?;
        Some(rule.apply(&self.ident.to_string()))
    }
}

impl EnumVariant<'_> {
    pub fn written_name(&self, meta: &TypeMeta) -> String {
        if let Some(rename) = &self.attrs.rename {
            return rename.value();
        }
        match meta.attrs().rename_all {
            Some(rule) => rule.apply(&self.ident.to_string()),
            None => self.ident.to_string(),
        }
    }
}
