use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::Result;
use crate::info::{InfoFn, Type, TypePath};

// -----------------------------------------------------------------------------
// ListKind

/// The container shapes that are written as a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// `[T; N]`, fixed length.
    Array,
    /// `Vec<T>`.
    List,
    /// `HashSet<T>`, `BTreeSet<T>`.
    Set,
    /// `VecDeque<T>`, written front first.
    Queue,
    /// [`Stack<T>`](crate::impls::Stack), written top first.
    Stack,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array => f.pad("Array"),
            Self::List => f.pad("List"),
            Self::Set => f.pad("Set"),
            Self::Queue => f.pad("Queue"),
            Self::Stack => f.pad("Stack"),
        }
    }
}

// -----------------------------------------------------------------------------
// ListInfo

/// Visits every item of an erased list in written order.
pub type ForEachItemFn = fn(&dyn Any, &mut dyn FnMut(&dyn Any));

/// Rebuilds a list from boxed items given in written order.
pub type FromItemsFn = fn(Vec<Box<dyn Any>>) -> Result<Box<dyn Any>>;

/// Descriptor of a sequence container.
#[derive(Debug, Clone)]
pub struct ListInfo {
    ty: Type,
    kind: ListKind,
    item: InfoFn,
    capacity: Option<usize>,
    count: fn(&dyn Any) -> usize,
    for_each: ForEachItemFn,
    from_items: FromItemsFn,
}

impl ListInfo {
    pub fn new<C: TypePath>(
        kind: ListKind,
        item: InfoFn,
        count: fn(&dyn Any) -> usize,
        for_each: ForEachItemFn,
        from_items: FromItemsFn,
    ) -> Self {
        Self {
            ty: Type::of::<C>(),
            kind,
            item,
            capacity: None,
            count,
            for_each,
            from_items,
        }
    }

    /// Sets the fixed length of an [`ListKind::Array`].
    #[inline]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    crate::info::impl_type_fn!(ty);

    #[inline]
    pub const fn kind(&self) -> ListKind {
        self.kind
    }

    #[inline]
    pub fn item(&self) -> InfoFn {
        self.item
    }

    /// The fixed length of an array, `None` for growable containers.
    #[inline]
    pub const fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    #[inline]
    pub fn count(&self, value: &dyn Any) -> usize {
        (self.count)(value)
    }

    #[inline]
    pub fn for_each(&self, value: &dyn Any, f: &mut dyn FnMut(&dyn Any)) {
        (self.for_each)(value, f);
    }

    #[inline]
    pub fn from_items(&self, items: Vec<Box<dyn Any>>) -> Result<Box<dyn Any>> {
        (self.from_items)(items)
    }
}
