use alloc::boxed::Box;
use core::any::Any;

use crate::info::{Type, TypePath};

// -----------------------------------------------------------------------------
// VariantInfo

/// One unit variant: its written name and its integer value.
#[derive(Debug, Clone, Copy)]
pub struct VariantInfo {
    name: &'static str,
    value: i64,
}

impl VariantInfo {
    #[inline]
    pub const fn new(name: &'static str, value: i64) -> Self {
        Self { name, value }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn value(&self) -> i64 {
        self.value
    }
}

// -----------------------------------------------------------------------------
// EnumInfo

/// Descriptor of an enum whose variants carry no data.
///
/// The first variant is the default value.
#[derive(Debug, Clone)]
pub struct EnumInfo {
    ty: Type,
    variants: Box<[VariantInfo]>,
    index_of: fn(&dyn Any) -> Option<usize>,
    from_index: fn(usize) -> Option<Box<dyn Any>>,
}

impl EnumInfo {
    /// Creates the descriptor of `T`.
    ///
    /// `index_of` maps a value to its position in `variants`, `from_index`
    /// builds the value at a position.
    pub fn new<T: TypePath>(
        variants: &[VariantInfo],
        index_of: fn(&dyn Any) -> Option<usize>,
        from_index: fn(usize) -> Option<Box<dyn Any>>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            variants: variants.into(),
            index_of,
            from_index,
        }
    }

    crate::info::impl_type_fn!(ty);

    #[inline]
    pub fn variants(&self) -> &[VariantInfo] {
        &self.variants
    }

    /// Returns the variant of an erased value.
    pub fn variant_of(&self, value: &dyn Any) -> Option<&VariantInfo> {
        (self.index_of)(value).and_then(|index| self.variants.get(index))
    }

    #[inline]
    pub fn index_of(&self, value: &dyn Any) -> Option<usize> {
        (self.index_of)(value)
    }

    #[inline]
    pub fn from_index(&self, index: usize) -> Option<Box<dyn Any>> {
        (self.from_index)(index)
    }

    /// Finds a variant by name, ignoring ASCII case.
    ///
    /// With `strip_separators`, `_` and `-` are ignored on both sides as a
    /// second attempt.
    pub fn find_by_name(&self, name: &str, strip_separators: bool) -> Option<usize> {
        let found = self
            .variants
            .iter()
            .position(|v| v.name.eq_ignore_ascii_case(name));
        if found.is_some() || !strip_separators {
            return found;
        }
        self.variants
            .iter()
            .position(|v| crate::access::eq_stripped(v.name, name))
    }

    /// Finds a variant by integer value.
    pub fn find_by_value(&self, value: i64) -> Option<usize> {
        self.variants.iter().position(|v| v.value == value)
    }
}
