use crate::info::{TypeInfo, TypePath};

/// A static accessor to the [`TypeInfo`] of a type.
///
/// Implemented by [`#[derive(Typed)]`](crate::derive::Typed) and by the
/// built-in impls in [`impls`](crate::impls).
///
/// # Manually Impl
///
/// Use [`NonGenericTypeInfoCell`] for plain types and [`GenericTypeInfoCell`]
/// for generic ones, so the descriptor is built once and lives for the rest
/// of the process.
///
/// ```
/// use vc_jsv::impls::NonGenericTypeInfoCell;
/// use vc_jsv::info::{OpaqueInfo, TypeInfo, TypePath, Typed};
///
/// #[derive(Debug, PartialEq)]
/// struct Celsius(f32);
///
/// impl core::fmt::Display for Celsius {
///     fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
///         write!(f, "{}C", self.0)
///     }
/// }
///
/// impl core::str::FromStr for Celsius {
///     type Err = core::num::ParseFloatError;
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         s.trim_end_matches('C').parse().map(Celsius)
///     }
/// }
///
/// impl TypePath for Celsius {
///     fn type_path() -> &'static str { "weather::Celsius" }
///     fn type_name() -> &'static str { "Celsius" }
///     fn type_ident() -> &'static str { "Celsius" }
/// }
///
/// impl Typed for Celsius {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
///     }
/// }
///
/// assert_eq!(vc_jsv::to_jsv(&Celsius(21.5)), "21.5C");
/// ```
///
/// [`NonGenericTypeInfoCell`]: crate::impls::NonGenericTypeInfoCell
/// [`GenericTypeInfoCell`]: crate::impls::GenericTypeInfoCell
pub trait Typed: TypePath {
    /// Returns the process-lifetime descriptor of `Self`.
    fn type_info() -> &'static TypeInfo;
}
