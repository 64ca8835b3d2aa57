//! [`Typed`] implementations for built-in types, plus the helpers used to
//! write them by hand.
//!
//! - [`NonGenericTypeInfoCell`]: used to implement [`Typed`] for non-generic types.
//! - [`GenericTypePathCell`]: used to implement [`TypePath`] for generic types.
//! - [`GenericTypeInfoCell`]: used to implement [`Typed`] for generic types.
//!
//! ## Implemented Menu
//!
//! - primitives:
//!     - `bool`, `char`, `i8`-`i128`, `u8`-`u128`, `isize`, `usize`, `f32`, `f64`
//!     - `String`, `uuid::Uuid`
//!     - [`DateTime`], `chrono::DateTime<Utc>`, `chrono::DateTime<FixedOffset>`,
//!       `chrono::NaiveDate`, `chrono::TimeDelta`
//! - `Option<T>`
//! - lists: `[T; N]`, `Vec<T>`, `VecDeque<T>`, `HashSet<T>`, `BTreeSet<T>`, [`Stack<T>`]
//! - maps: `HashMap<K, V>`, `BTreeMap<K, V>`
//! - tuples: `(P0,)` to `(P0, .., P7)`, [`KeyValuePair<K, V>`]
//! - opaque: `IpAddr`, `Ipv4Addr`, `Ipv6Addr`, `SocketAddr`, `PathBuf`
//! - `Box<dyn Trait>` through [`impl_abstract!`](crate::impl_abstract)
//!
//! [`DateTime`]: crate::time::DateTime
//! [`TypePath`]: crate::info::TypePath
//! [`Typed`]: crate::info::Typed

// -----------------------------------------------------------------------------
// Modules

mod cell;

mod abstracts;
mod collections;
mod opaque;
mod primitives;
mod tuples;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, GenericTypePathCell, NonGenericTypeInfoCell};
pub use collections::Stack;
pub use tuples::KeyValuePair;

/// An efficient string concatenation function.
///
/// This is usually used for the implementation of `TypePath`.
///
/// # Example
///
/// ```
/// use vc_jsv::impls;
///
/// let s = impls::concat(&["Vec", "<", "u8", ">"]);
///
/// assert_eq!(s, "Vec<u8>");
/// assert_eq!(s.capacity(), 7);
/// ```
#[inline(never)]
pub fn concat(arr: &[&str]) -> ::alloc::string::String {
    let len = arr.iter().map(|item| item.len()).sum();
    let mut res = ::alloc::string::String::with_capacity(len);
    for &item in arr {
        res.push_str(item);
    }
    res
}

/// Moves a boxed item out as `T`, or reports the expected type.
pub(crate) fn downcast_item<T: crate::info::TypePath>(
    item: ::alloc::boxed::Box<dyn ::core::any::Any>,
) -> crate::Result<T> {
    match item.downcast::<T>() {
        Ok(item) => Ok(*item),
        Err(_) => Err(crate::Error::TypeMismatch {
            expected: T::type_path(),
        }),
    }
}
