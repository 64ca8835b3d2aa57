//! Tuples with up to eight fields, and [`KeyValuePair`].
//!
//! Both are written as maps: `{Item1:..,Item2:..}` and `{Key:..,Value:..}`.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, downcast_item};
use crate::info::{TupleInfo, TupleKind, TypeInfo, TypePath, Typed};
use crate::{Error, Result};

// -----------------------------------------------------------------------------
// Erased tuple operations

trait TupleFields: TypePath + Sized {
    const LEN: usize;

    fn field(&self, index: usize) -> Option<&dyn Any>;

    fn from_vec(fields: Vec<Box<dyn Any>>) -> Result<Self>;
}

fn tuple_field<T: TupleFields>(value: &dyn Any, index: usize) -> Option<&dyn Any> {
    value.downcast_ref::<T>()?.field(index)
}

fn tuple_from_fields<T: TupleFields>(fields: Vec<Box<dyn Any>>) -> Result<Box<dyn Any>> {
    if fields.len() != T::LEN {
        return Err(Error::Length {
            type_path: T::type_path(),
            expected: T::LEN,
            found: fields.len(),
        });
    }
    Ok(Box::new(T::from_vec(fields)?))
}

// -----------------------------------------------------------------------------
// Tuples

macro_rules! impl_tuple {
    ($len:literal: [$($index:tt: $P:ident),*]) => {
        impl<$($P: TypePath),*> TypePath for ($($P,)*) {
            fn type_path() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    let paths: &[&str] = &[$($P::type_path()),*];
                    crate::impls::concat(&["(", &paths.join(", "), ")"])
                })
            }

            fn type_name() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    let names: &[&str] = &[$($P::type_name()),*];
                    crate::impls::concat(&["(", &names.join(", "), ")"])
                })
            }

            #[inline]
            fn type_ident() -> &'static str {
                "Tuple"
            }
        }

        impl<$($P: Typed),*> TupleFields for ($($P,)*) {
            const LEN: usize = $len;

            fn field(&self, index: usize) -> Option<&dyn Any> {
                match index {
                    $($index => Some(&self.$index),)*
                    _ => None,
                }
            }

            fn from_vec(fields: Vec<Box<dyn Any>>) -> Result<Self> {
                let mut fields = fields.into_iter();
                Ok(($(
                    match fields.next() {
                        Some(field) => downcast_item::<$P>(field)?,
                        None => return Err(Error::NoDefault { type_path: $P::type_path() }),
                    },
                )*))
            }
        }

        impl<$($P: Typed),*> Typed for ($($P,)*) {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Tuple(TupleInfo::new::<Self>(
                        TupleKind::Tuple,
                        &[$($P::type_info),*],
                        tuple_field::<Self>,
                        tuple_from_fields::<Self>,
                    ))
                })
            }
        }
    };
}

impl_tuple!(1: [0: P0]);
impl_tuple!(2: [0: P0, 1: P1]);
impl_tuple!(3: [0: P0, 1: P1, 2: P2]);
impl_tuple!(4: [0: P0, 1: P1, 2: P2, 3: P3]);
impl_tuple!(5: [0: P0, 1: P1, 2: P2, 3: P3, 4: P4]);
impl_tuple!(6: [0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5]);
impl_tuple!(7: [0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5, 6: P6]);
impl_tuple!(8: [0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5, 6: P6, 7: P7]);

// -----------------------------------------------------------------------------
// KeyValuePair

/// A single dictionary entry, written as `{Key:..,Value:..}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyValuePair<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> KeyValuePair<K, V> {
    #[inline]
    pub const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K, V> From<(K, V)> for KeyValuePair<K, V> {
    #[inline]
    fn from((key, value): (K, V)) -> Self {
        Self { key, value }
    }
}

impl<K: TypePath, V: TypePath> TypePath for KeyValuePair<K, V> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| {
            crate::impls::concat(&[
                "vc_jsv::impls::KeyValuePair<",
                K::type_path(),
                ", ",
                V::type_path(),
                ">",
            ])
        })
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| {
            crate::impls::concat(&["KeyValuePair<", K::type_name(), ", ", V::type_name(), ">"])
        })
    }

    #[inline]
    fn type_ident() -> &'static str {
        "KeyValuePair"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("vc_jsv::impls")
    }
}

impl<K: Typed, V: Typed> TupleFields for KeyValuePair<K, V> {
    const LEN: usize = 2;

    fn field(&self, index: usize) -> Option<&dyn Any> {
        match index {
            0 => Some(&self.key),
            1 => Some(&self.value),
            _ => None,
        }
    }

    fn from_vec(fields: Vec<Box<dyn Any>>) -> Result<Self> {
        let mut fields = fields.into_iter();
        match (fields.next(), fields.next()) {
            (Some(key), Some(value)) => Ok(Self {
                key: downcast_item::<K>(key)?,
                value: downcast_item::<V>(value)?,
            }),
            _ => Err(Error::Length {
                type_path: Self::type_path(),
                expected: 2,
                found: 0,
            }),
        }
    }
}

impl<K: Typed, V: Typed> Typed for KeyValuePair<K, V> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Tuple(TupleInfo::new::<Self>(
                TupleKind::KeyValue,
                &[K::type_info, V::type_info],
                tuple_field::<Self>,
                tuple_from_fields::<Self>,
            ))
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::any::Any;

    use super::KeyValuePair;
    use crate::info::{TupleKind, TypePath, Typed};

    #[test]
    fn tuple_names_and_fields() {
        assert_eq!(<(u8, String)>::type_name(), "(u8, String)");

        let info = <(u8, String)>::type_info().as_tuple().unwrap();
        assert_eq!(info.field_name(0), Some("Item1"));
        assert_eq!(info.field_name(1), Some("Item2"));

        let value = (7_u8, String::from("x"));
        let first = info.field(&value, 0).and_then(|v| v.downcast_ref::<u8>());
        assert_eq!(first, Some(&7));
        assert!(info.field(&value, 2).is_none());
    }

    #[test]
    fn key_value_pair_fields() {
        let info = <KeyValuePair<String, i32>>::type_info().as_tuple().unwrap();
        assert_eq!(info.kind(), TupleKind::KeyValue);
        assert_eq!(info.field_name(0), Some("Key"));
        assert_eq!(info.field_name(1), Some("Value"));

        let fields: Vec<Box<dyn Any>> = vec![Box::new(String::from("a")), Box::new(1_i32)];
        let pair = info.from_fields(fields).unwrap();
        let pair = pair.downcast::<KeyValuePair<String, i32>>().unwrap();
        assert_eq!(*pair, KeyValuePair::new(String::from("a"), 1));
    }

    #[test]
    fn tuple_rejects_wrong_field_count() {
        let info = <(u8, u8)>::type_info().as_tuple().unwrap();
        let fields: Vec<Box<dyn Any>> = vec![Box::new(1_u8)];
        assert!(info.from_fields(fields).is_err());
    }
}
