use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::string::ToString;
use alloc::vec::Vec;
use core::any::Any;
use core::hash::Hash;
use std::collections::{HashMap, HashSet};

use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, downcast_item};
use crate::info::{ListInfo, ListKind, MapInfo, TypeInfo, TypePath, Typed};
use crate::{Error, Result};

// -----------------------------------------------------------------------------
// Stack

/// A last-in first-out sequence.
///
/// Written top first, and read back so that the first written item is the
/// top again.
///
/// # Examples
///
/// ```
/// use vc_jsv::impls::Stack;
///
/// let mut stack = Stack::new();
/// stack.push(1);
/// stack.push(2);
///
/// assert_eq!(vc_jsv::to_jsv(&stack), "[2,1]");
/// let back: Stack<i32> = vc_jsv::from_jsv("[2,1]").unwrap().unwrap();
/// assert_eq!(back, stack);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Default for Stack<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Stack<T> {
    #[inline]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates from the top of the stack down.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.items.iter().rev()
    }
}

impl<T> FromIterator<T> for Stack<T> {
    /// Pushes every item in order, so the last one ends on top.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

// -----------------------------------------------------------------------------
// Erased list operations

/// Containers written as a list, with items in written order.
trait ListLike: Any + Sized {
    type Item: Typed;

    const KIND: ListKind;

    fn len(&self) -> usize;

    fn visit(&self, f: &mut dyn FnMut(&dyn Any));

    fn from_vec(items: Vec<Self::Item>) -> Result<Self>;
}

fn list_count<C: ListLike>(value: &dyn Any) -> usize {
    value.downcast_ref::<C>().map_or(0, C::len)
}

fn list_for_each<C: ListLike>(value: &dyn Any, f: &mut dyn FnMut(&dyn Any)) {
    if let Some(value) = value.downcast_ref::<C>() {
        value.visit(f);
    }
}

fn list_from_items<C: ListLike>(items: Vec<Box<dyn Any>>) -> Result<Box<dyn Any>> {
    let items = items
        .into_iter()
        .map(downcast_item::<C::Item>)
        .collect::<Result<Vec<_>>>()?;
    Ok(Box::new(C::from_vec(items)?))
}

fn list_info<C: ListLike + TypePath>() -> ListInfo {
    ListInfo::new::<C>(
        C::KIND,
        C::Item::type_info,
        list_count::<C>,
        list_for_each::<C>,
        list_from_items::<C>,
    )
}

macro_rules! impl_list_like {
    ($ty:ident, $kind:ident $(, $bound:path)*) => {
        impl<T: Typed $(+ $bound)*> ListLike for $ty<T> {
            type Item = T;

            const KIND: ListKind = ListKind::$kind;

            #[inline]
            fn len(&self) -> usize {
                $ty::len(self)
            }

            fn visit(&self, f: &mut dyn FnMut(&dyn Any)) {
                self.iter().for_each(|item| f(item));
            }

            #[inline]
            fn from_vec(items: Vec<T>) -> Result<Self> {
                Ok(items.into_iter().collect())
            }
        }
    };
}

impl_list_like!(Vec, List);
impl_list_like!(VecDeque, Queue);
impl_list_like!(HashSet, Set, Eq, Hash);
impl_list_like!(BTreeSet, Set, Ord);

impl<T: Typed> ListLike for Stack<T> {
    type Item = T;

    const KIND: ListKind = ListKind::Stack;

    #[inline]
    fn len(&self) -> usize {
        self.items.len()
    }

    fn visit(&self, f: &mut dyn FnMut(&dyn Any)) {
        self.iter().for_each(|item| f(item));
    }

    fn from_vec(mut items: Vec<T>) -> Result<Self> {
        items.reverse();
        Ok(Self { items })
    }
}

impl<T: Typed, const N: usize> ListLike for [T; N] {
    type Item = T;

    const KIND: ListKind = ListKind::Array;

    #[inline]
    fn len(&self) -> usize {
        N
    }

    fn visit(&self, f: &mut dyn FnMut(&dyn Any)) {
        self.iter().for_each(|item| f(item));
    }

    fn from_vec(items: Vec<T>) -> Result<Self> {
        let found = items.len();
        <[T; N]>::try_from(items).map_err(|_| Error::Length {
            type_path: Self::type_path(),
            expected: N,
            found,
        })
    }
}

// -----------------------------------------------------------------------------
// List impls

macro_rules! impl_list_typed {
    ($ty:ident, $path:literal, $module:literal $(, $bound:path)*) => {
        impl<T: TypePath> TypePath for $ty<T> {
            fn type_path() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    crate::impls::concat(&[$path, "<", T::type_path(), ">"])
                })
            }

            fn type_name() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    crate::impls::concat(&[stringify!($ty), "<", T::type_name(), ">"])
                })
            }

            #[inline]
            fn type_ident() -> &'static str {
                stringify!($ty)
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                Some($module)
            }
        }

        impl<T: Typed $(+ $bound)*> Typed for $ty<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| TypeInfo::List(list_info::<Self>()))
            }
        }
    };
}

impl_list_typed!(Vec, "alloc::vec::Vec", "alloc::vec");
impl_list_typed!(VecDeque, "alloc::collections::VecDeque", "alloc::collections");
impl_list_typed!(BTreeSet, "alloc::collections::BTreeSet", "alloc::collections", Ord);
impl_list_typed!(HashSet, "std::collections::HashSet", "std::collections", Eq, Hash);
impl_list_typed!(Stack, "vc_jsv::impls::Stack", "vc_jsv::impls");

impl<T: TypePath, const N: usize> TypePath for [T; N] {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| {
            crate::impls::concat(&["[", T::type_path(), "; ", &N.to_string(), "]"])
        })
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| {
            crate::impls::concat(&["[", T::type_name(), "; ", &N.to_string(), "]"])
        })
    }

    #[inline]
    fn type_ident() -> &'static str {
        "[T; N]"
    }
}

impl<T: Typed, const N: usize> Typed for [T; N] {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::List(list_info::<Self>().with_capacity(N)))
    }
}

// -----------------------------------------------------------------------------
// Erased map operations

trait MapLike: Any + Sized {
    type Key: Typed;
    type Value: Typed;

    fn len(&self) -> usize;

    fn visit(&self, f: &mut dyn FnMut(&dyn Any, &dyn Any));

    fn from_vec(entries: Vec<(Self::Key, Self::Value)>) -> Self;
}

fn map_count<M: MapLike>(value: &dyn Any) -> usize {
    value.downcast_ref::<M>().map_or(0, M::len)
}

fn map_for_each<M: MapLike>(value: &dyn Any, f: &mut dyn FnMut(&dyn Any, &dyn Any)) {
    if let Some(value) = value.downcast_ref::<M>() {
        value.visit(f);
    }
}

fn map_from_entries<M: MapLike>(entries: Vec<(Box<dyn Any>, Box<dyn Any>)>) -> Result<Box<dyn Any>> {
    let entries = entries
        .into_iter()
        .map(|(k, v)| Ok((downcast_item::<M::Key>(k)?, downcast_item::<M::Value>(v)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Box::new(M::from_vec(entries)))
}

macro_rules! impl_map {
    ($ty:ident, $path:literal, $module:literal $(, $bound:path)*) => {
        impl<K: Typed $(+ $bound)*, V: Typed> MapLike for $ty<K, V> {
            type Key = K;
            type Value = V;

            #[inline]
            fn len(&self) -> usize {
                $ty::len(self)
            }

            fn visit(&self, f: &mut dyn FnMut(&dyn Any, &dyn Any)) {
                self.iter().for_each(|(k, v)| f(k, v));
            }

            #[inline]
            fn from_vec(entries: Vec<(K, V)>) -> Self {
                entries.into_iter().collect()
            }
        }

        impl<K: TypePath, V: TypePath> TypePath for $ty<K, V> {
            fn type_path() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    crate::impls::concat(&[$path, "<", K::type_path(), ", ", V::type_path(), ">"])
                })
            }

            fn type_name() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    crate::impls::concat(&[
                        stringify!($ty), "<", K::type_name(), ", ", V::type_name(), ">",
                    ])
                })
            }

            #[inline]
            fn type_ident() -> &'static str {
                stringify!($ty)
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                Some($module)
            }
        }

        impl<K: Typed $(+ $bound)*, V: Typed> Typed for $ty<K, V> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Map(MapInfo::new::<Self>(
                        K::type_info,
                        V::type_info,
                        map_count::<Self>,
                        map_for_each::<Self>,
                        map_from_entries::<Self>,
                    ))
                })
            }
        }
    };
}

impl_map!(HashMap, "std::collections::HashMap", "std::collections", Eq, Hash);
impl_map!(BTreeMap, "alloc::collections::BTreeMap", "alloc::collections", Ord);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::any::Any;

    use super::Stack;
    use crate::info::{ListKind, TypePath, Typed};

    #[test]
    fn stack_iterates_top_first() {
        let stack: Stack<i32> = [1, 2, 3].into_iter().collect();
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(stack.peek(), Some(&3));
    }

    #[test]
    fn stack_rebuilds_in_written_order() {
        let info = <Stack<i32>>::type_info().as_list().unwrap();
        assert_eq!(info.kind(), ListKind::Stack);

        let items: Vec<Box<dyn Any>> = vec![Box::new(3_i32), Box::new(2_i32), Box::new(1_i32)];
        let stack = info.from_items(items).unwrap();
        let stack = stack.downcast::<Stack<i32>>().unwrap();
        assert_eq!(stack.peek(), Some(&3));
    }

    #[test]
    fn array_rejects_wrong_length() {
        let info = <[u8; 2]>::type_info().as_list().unwrap();
        assert_eq!(info.capacity(), Some(2));
        assert_eq!(<[u8; 2]>::type_name(), "[u8; 2]");

        let items: Vec<Box<dyn Any>> = vec![Box::new(1_u8)];
        let err = info.from_items(items).unwrap_err();
        assert!(matches!(err, crate::Error::Length { expected: 2, found: 1, .. }));
    }

    #[test]
    fn map_visits_entries() {
        let info = <BTreeMap<u8, bool>>::type_info().as_map().unwrap();
        let map = BTreeMap::from([(1_u8, true), (2, false)]);

        let mut keys = Vec::new();
        info.for_each(&map, &mut |k, _| keys.extend(k.downcast_ref::<u8>().copied()));
        assert_eq!(keys, vec![1, 2]);
        assert_eq!(info.count(&map), 2);
    }
}
