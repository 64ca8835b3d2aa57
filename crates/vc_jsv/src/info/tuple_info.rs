use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;
use core::any::Any;

use crate::Result;
use crate::info::{InfoFn, Type, TypePath};

/// Whether a tuple-shaped type writes `Item1..ItemN` or `Key`/`Value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TupleKind {
    Tuple,
    KeyValue,
}

/// Descriptor of a fixed group of positional fields.
///
/// Tuples are written as maps. A tuple field is named `Item{n}` starting at
/// one, a [`KeyValuePair`](crate::impls::KeyValuePair) uses `Key` and
/// `Value`.
#[derive(Debug, Clone)]
pub struct TupleInfo {
    ty: Type,
    kind: TupleKind,
    fields: Box<[InfoFn]>,
    names: Box<[Box<str>]>,
    field: fn(&dyn Any, usize) -> Option<&dyn Any>,
    from_fields: fn(Vec<Box<dyn Any>>) -> Result<Box<dyn Any>>,
}

impl TupleInfo {
    pub fn new<T: TypePath>(
        kind: TupleKind,
        fields: &[InfoFn],
        field: fn(&dyn Any, usize) -> Option<&dyn Any>,
        from_fields: fn(Vec<Box<dyn Any>>) -> Result<Box<dyn Any>>,
    ) -> Self {
        let names: Box<[Box<str>]> = match kind {
            TupleKind::KeyValue => Box::new([Box::from("Key"), Box::from("Value")]),
            TupleKind::Tuple => (1..=fields.len())
                .map(|n| format!("Item{n}").into_boxed_str())
                .collect(),
        };
        Self {
            ty: Type::of::<T>(),
            kind,
            fields: fields.into(),
            names,
            field,
            from_fields,
        }
    }

    crate::info::impl_type_fn!(ty);

    #[inline]
    pub const fn kind(&self) -> TupleKind {
        self.kind
    }

    #[inline]
    pub fn fields(&self) -> &[InfoFn] {
        &self.fields
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    /// Returns the written name of the field at `index`.
    #[inline]
    pub fn field_name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(|name| &**name)
    }

    #[inline]
    pub fn field<'a>(&self, value: &'a dyn Any, index: usize) -> Option<&'a dyn Any> {
        (self.field)(value, index)
    }

    #[inline]
    pub fn from_fields(&self, fields: Vec<Box<dyn Any>>) -> Result<Box<dyn Any>> {
        (self.from_fields)(fields)
    }
}
