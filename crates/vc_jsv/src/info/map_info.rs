use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use crate::Result;
use crate::info::{InfoFn, Type, TypePath};

/// Visits every entry of an erased map.
pub type ForEachEntryFn = fn(&dyn Any, &mut dyn FnMut(&dyn Any, &dyn Any));

/// Rebuilds a map from boxed entries.
pub type FromEntriesFn = fn(Vec<(Box<dyn Any>, Box<dyn Any>)>) -> Result<Box<dyn Any>>;

/// Descriptor of a dictionary.
#[derive(Debug, Clone)]
pub struct MapInfo {
    ty: Type,
    key: InfoFn,
    value: InfoFn,
    count: fn(&dyn Any) -> usize,
    for_each: ForEachEntryFn,
    from_entries: FromEntriesFn,
}

impl MapInfo {
    pub fn new<M: TypePath>(
        key: InfoFn,
        value: InfoFn,
        count: fn(&dyn Any) -> usize,
        for_each: ForEachEntryFn,
        from_entries: FromEntriesFn,
    ) -> Self {
        Self {
            ty: Type::of::<M>(),
            key,
            value,
            count,
            for_each,
            from_entries,
        }
    }

    crate::info::impl_type_fn!(ty);

    #[inline]
    pub fn key(&self) -> InfoFn {
        self.key
    }

    #[inline]
    pub fn value(&self) -> InfoFn {
        self.value
    }

    #[inline]
    pub fn count(&self, value: &dyn Any) -> usize {
        (self.count)(value)
    }

    #[inline]
    pub fn for_each(&self, value: &dyn Any, f: &mut dyn FnMut(&dyn Any, &dyn Any)) {
        (self.for_each)(value, f);
    }

    #[inline]
    pub fn from_entries(&self, entries: Vec<(Box<dyn Any>, Box<dyn Any>)>) -> Result<Box<dyn Any>> {
        (self.from_entries)(entries)
    }
}
