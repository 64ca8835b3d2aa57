//! Parsing of `#[jsv(...)]` attributes.

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr, Path};

use crate::JSV_ATTRIBUTE_NAME;
use crate::utils::RenameRule;

/// Marker added by `#[jsv(runtime_serializable)]`.
const RUNTIME_SERIALIZABLE: &str = "RuntimeSerializable";

// -----------------------------------------------------------------------------
// Shared parsing

/// Reads the value of `key = "..."` or `key = some::path`.
fn parse_path_value(meta: &ParseNestedMeta) -> syn::Result<Path> {
    let value = meta.value()?;
    if value.peek(LitStr) {
        value.parse::<LitStr>()?.parse()
    } else {
        value.parse()
    }
}

fn parse_str_value(meta: &ParseNestedMeta) -> syn::Result<LitStr> {
    meta.value()?.parse()
}

/// Calls `f` for every nested meta of every `#[jsv(...)]` attribute.
fn for_each_meta(
    attrs: &[Attribute],
    mut f: impl FnMut(ParseNestedMeta) -> syn::Result<()>,
) -> syn::Result<()> {
    for attr in attrs {
        if attr.path().is_ident(JSV_ATTRIBUTE_NAME) {
            attr.parse_nested_meta(&mut f)?;
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// TypeAttributes

/// Attributes placed on the type itself.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    /// `type_path = "a::b::C"`, replaces `module_path!()::Ident`.
    pub type_path: Option<LitStr>,
    /// `rename_all = "camelCase"`.
    pub rename_all: Option<RenameRule>,
    /// `lenient`
    pub lenient: Option<Span>,
    /// `on_deserializing = path`
    pub on_deserializing: Option<Path>,
    /// `on_deserialized = path`
    pub on_deserialized: Option<Path>,
    /// `marker = "Name"` and `runtime_serializable`.
    pub markers: Vec<LitStr>,
    /// `implements(TraitA, TraitB)`
    pub implements: Vec<Path>,
    /// `opaque`
    pub opaque: Option<Span>,
    /// `auto_register`
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for_each_meta(attrs, |meta| this.parse_meta(meta))?;
        Ok(this)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        let span = meta.path.get_ident().map_or_else(Span::call_site, |i| i.span());

        if meta.path.is_ident("type_path") {
            self.type_path = Some(parse_str_value(&meta)?);
        } else if meta.path.is_ident("rename_all") {
            let lit = parse_str_value(&meta)?;
            self.rename_all = Some(RenameRule::from_lit(&lit)?);
        } else if meta.path.is_ident("lenient") {
            self.lenient = Some(span);
        } else if meta.path.is_ident("on_deserializing") {
            self.on_deserializing = Some(parse_path_value(&meta)?);
        } else if meta.path.is_ident("on_deserialized") {
            self.on_deserialized = Some(parse_path_value(&meta)?);
        } else if meta.path.is_ident("marker") {
            self.markers.push(parse_str_value(&meta)?);
        } else if meta.path.is_ident("runtime_serializable") {
            self.markers.push(LitStr::new(RUNTIME_SERIALIZABLE, span));
        } else if meta.path.is_ident("implements") {
            meta.parse_nested_meta(|inner| {
                self.implements.push(inner.path);
                Ok(())
            })?;
        } else if meta.path.is_ident("opaque") {
            self.opaque = Some(span);
        } else if meta.path.is_ident("auto_register") {
            self.auto_register = Some(span);
        } else {
            return Err(meta.error(
                "unknown type attribute, expected one of: type_path, rename_all, lenient, \
                 on_deserializing, on_deserialized, marker, runtime_serializable, \
                 implements, opaque, auto_register",
            ));
        }
        Ok(())
    }

    /// Returns an error if any struct-only attribute is set.
    pub fn deny_struct_only(&self, kind: &str) -> syn::Result<()> {
        let message = |name: &str| format!("`{name}` is not supported on {kind}");
        if let Some(span) = self.lenient {
            return Err(syn::Error::new(span, message("lenient")));
        }
        if let Some(path) = self.on_deserializing.as_ref().or(self.on_deserialized.as_ref()) {
            return Err(syn::Error::new_spanned(path, message("on_deserializ*")));
        }
        if let Some(marker) = self.markers.first() {
            return Err(syn::Error::new(marker.span(), message("marker")));
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// Attributes placed on a struct field or an enum variant.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    /// `rename = "alias"`
    pub rename: Option<LitStr>,
    /// `skip`, fields only.
    pub skip: Option<Span>,
    /// `should_serialize = path`, fields only.
    pub should_serialize: Option<Path>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for_each_meta(attrs, |meta| {
            if meta.path.is_ident("rename") {
                this.rename = Some(parse_str_value(&meta)?);
            } else if meta.path.is_ident("skip") {
                this.skip = Some(meta.path.get_ident().map_or_else(Span::call_site, |i| i.span()));
            } else if meta.path.is_ident("should_serialize") {
                this.should_serialize = Some(parse_path_value(&meta)?);
            } else {
                return Err(meta.error(
                    "unknown member attribute, expected one of: rename, skip, should_serialize",
                ));
            }
            Ok(())
        })?;
        Ok(this)
    }

    /// Variants only accept `rename`.
    pub fn parse_variant_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let this = Self::parse_attrs(attrs)?;
        if let Some(span) = this.skip {
            return Err(syn::Error::new(span, "`skip` is not supported on variants"));
        }
        if let Some(path) = &this.should_serialize {
            return Err(syn::Error::new_spanned(
                path,
                "`should_serialize` is not supported on variants",
            ));
        }
        Ok(this)
    }
}
