//! Member accessor tables.
//!
//! A [`TypeDescriptor`] is built once per struct type from its
//! [`StructInfo`](crate::info::StructInfo) and cached for the rest of the
//! process. Its accessors are sorted by name, ignoring case, so parsing can
//! find the member of a key with a binary search.
//!
//! Lookup in [`TypeDescriptor::find_accessor`] tries, in order:
//!
//! 1. the exact name, ignoring case;
//! 2. the name written under the active [`TextCase`](crate::config::TextCase);
//! 3. with lenient matching, the name with `-` and `_` removed.

// -----------------------------------------------------------------------------
// Modules

mod case;
mod descriptor;

// -----------------------------------------------------------------------------
// Exports

pub use case::{cmp_ignore_case, convert_case, eq_stripped, strip_name};
pub use case::{to_camel_case, to_pascal_case, to_snake_case};
pub use descriptor::{MemberAccessor, TypeDescriptor};
