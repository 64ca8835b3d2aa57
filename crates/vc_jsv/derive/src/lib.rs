//! See [`Typed`](derive_typed).
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static JSV_ATTRIBUTE_NAME: &str = "jsv";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;
mod utils;

// -----------------------------------------------------------------------------
// Macros

/// # Type Descriptor Derivation
///
/// `#[derive(Typed)]` implements `TypePath` and `Typed`, producing the static
/// descriptor the serializers are driven by.
///
/// - A struct with named fields (or a unit struct) becomes a `Struct`: every
///   field is a member, written in declaration order. The struct must
///   implement `Default`, which is the starting point of every read, and
///   every field type must implement `Typed`.
/// - An enum of unit variants becomes an `Enum`. Variant values are the
///   discriminants, so `High = 10` is written as `10` when enums are
///   written as integers.
/// - `#[jsv(opaque)]` writes the type through `Display` and reads it
///   through `FromStr`.
///
/// Tuple structs, unions, enums with data and types with lifetimes are
/// rejected.
///
/// ```rust, ignore
/// #[derive(Typed, Default)]
/// #[jsv(rename_all = "camelCase", runtime_serializable)]
/// struct User {
///     user_name: String,
///     #[jsv(rename = "Age")]
///     age: u32,
///     #[jsv(skip)]
///     cache: Vec<u8>,
/// }
///
/// #[derive(Typed, Default)]
/// enum Level {
///     #[default]
///     Low,
///     #[jsv(rename = "MEDIUM")]
///     Medium,
///     High = 10,
/// }
/// ```
///
/// ## Type Attributes
///
/// - `type_path = "a::b::Name"`: replaces `module_path!()::Name`. Generic
///   arguments are appended automatically. This is the text written under
///   `__type`.
/// - `rename_all = "camelCase" | "PascalCase" | "snake_case"`: renames every
///   member or variant. Renamed members keep their name whatever the
///   configured text case is.
/// - `lenient`: member names always match ignoring `-` and `_`.
/// - `on_deserializing = path`: `fn(&mut Self, &str, &str) -> Option<String>`,
///   called with the member name and raw text before each member is read.
///   Returning `Some` replaces the text.
/// - `on_deserialized = path`: `fn(&mut Self)`, called after a read.
/// - `marker = "Name"`: a marker name checked by the runtime-type allow-list.
/// - `runtime_serializable`: shorthand for `marker = "RuntimeSerializable"`,
///   which the default allow-list trusts.
/// - `implements(TraitA, TraitB)`: registers the type as an implementor of
///   `Box<dyn TraitA>`, so it can be read back from a tagged abstract slot.
/// - `auto_register`: registers the type in the global registry.
/// - `opaque`: see above.
///
/// `lenient`, the hooks and markers only apply to structs.
///
/// ## Auto Registration
///
/// `auto_register` and `implements(..)` submit a registration that runs when
/// the global registry is first used. They have no effect on generic types,
/// and none when the `auto_register` feature is disabled.
///
/// ## Member Attributes
///
/// - `rename = "Alias"`: the written name.
/// - `skip`: the field is never written nor read, and keeps its default.
/// - `should_serialize = path`: `fn(&Self) -> bool`, the member is only
///   written when it returns `true`.
///
/// ## Variant Attributes
///
/// - `rename = "Alias"`
#[proc_macro_derive(Typed, attributes(jsv))]
pub fn derive_typed(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::TypeDerive::from_input(&ast) {
        Ok(derive) => impls::match_typed_impls(&derive).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
