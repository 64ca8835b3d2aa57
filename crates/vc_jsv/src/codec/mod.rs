//! Element-level codecs for lists, maps and tuples.
//!
//! A codec holds the writer and parser of the element types of one
//! container shape, and is cached per format and element type(s). Every
//! container with the same elements shares it: `Vec<u8>`, `VecDeque<u8>` and
//! `[u8; 4]` all use the sequence codec of `u8`, and only differ in how the
//! items are collected back, see
//! [`ListInfo::from_items`](crate::info::ListInfo::from_items).
//!
//! Map codecs are keyed by both element types in order, so `(A, B)` and
//! `(B, A)` never share an entry.
//!
//! Like the dispatch caches, these are copy-on-write snapshots: racing first
//! uses may build a codec twice, and one of the two is published.

// -----------------------------------------------------------------------------
// Modules

mod list;
mod map;
mod tuple;

// -----------------------------------------------------------------------------
// Exports

pub use list::SequenceCodec;
pub use map::MapCodec;
pub use tuple::TupleCodec;

use alloc::sync::Arc;
use core::any::TypeId;
use std::sync::LazyLock;

use vc_utils::SnapshotMap;

use crate::format::Format;
use crate::info::{ListInfo, MapInfo, TupleInfo};

// -----------------------------------------------------------------------------
// Cache keys

/// The element types a codec is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Single(TypeId),
    /// Ordered: `Pair(a, b)` differs from `Pair(b, a)`.
    Pair(TypeId, TypeId),
}

/// Identifies one cached codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub format: Format,
    pub types: TypeKey,
}

impl CacheKey {
    #[inline]
    pub const fn single(format: Format, id: TypeId) -> Self {
        Self {
            format,
            types: TypeKey::Single(id),
        }
    }

    #[inline]
    pub const fn pair(format: Format, a: TypeId, b: TypeId) -> Self {
        Self {
            format,
            types: TypeKey::Pair(a, b),
        }
    }
}

static SEQUENCES: LazyLock<SnapshotMap<CacheKey, Arc<SequenceCodec>>> =
    LazyLock::new(SnapshotMap::new);

static MAPS: LazyLock<SnapshotMap<CacheKey, Arc<MapCodec>>> = LazyLock::new(SnapshotMap::new);

static TUPLES: LazyLock<SnapshotMap<CacheKey, Arc<TupleCodec>>> =
    LazyLock::new(SnapshotMap::new);

// -----------------------------------------------------------------------------
// Lookup

/// Returns the sequence codec of the items of `info`.
pub fn sequence(format: Format, info: &'static ListInfo) -> Arc<SequenceCodec> {
    let item = info.item();
    let key = CacheKey::single(format, item().type_id());
    SEQUENCES.get_or_insert_with(key, || {
        log::debug!("building {format} sequence codec of `{}`", item().type_path());
        Arc::new(SequenceCodec::new(format, item))
    })
}

/// Returns the map codec of the key and value types of `info`.
pub fn map(format: Format, info: &'static MapInfo) -> Arc<MapCodec> {
    let (key, value) = (info.key(), info.value());
    let cache_key = CacheKey::pair(format, key().type_id(), value().type_id());
    MAPS.get_or_insert_with(cache_key, || {
        log::debug!(
            "building {format} map codec of `{}` to `{}`",
            key().type_path(),
            value().type_path()
        );
        Arc::new(MapCodec::new(format, key, value))
    })
}

/// Returns the codec of a tuple or key-value pair type.
///
/// Tuples are keyed by their own type, key-value pairs by their key and
/// value types.
pub fn tuple(format: Format, info: &'static TupleInfo) -> Arc<TupleCodec> {
    let cache_key = match info.fields() {
        [key, value] if info.kind() == crate::info::TupleKind::KeyValue => {
            CacheKey::pair(format, key().type_id(), value().type_id())
        }
        _ => CacheKey::single(format, info.type_id()),
    };
    TUPLES.get_or_insert_with(cache_key, || {
        log::debug!("building {format} tuple codec of `{}`", info.type_path());
        Arc::new(TupleCodec::new(format, info))
    })
}

/// Returns `true` if a sequence codec of `item` is cached.
pub fn has_sequence(format: Format, item: TypeId) -> bool {
    SEQUENCES.contains_key(&CacheKey::single(format, item))
}

/// Returns `true` if a map codec of `key` to `value` is cached.
pub fn has_map(format: Format, key: TypeId, value: TypeId) -> bool {
    MAPS.contains_key(&CacheKey::pair(format, key, value))
}

/// The number of cached codecs of every shape.
pub fn cached_len() -> usize {
    SEQUENCES.len() + MAPS.len() + TUPLES.len()
}

/// Drops every cached codec.
///
/// Called by [`dispatch::reset_caches`](crate::dispatch::reset_caches), as
/// codecs hold element functions that may have been overridden.
pub fn reset_cache() {
    SEQUENCES.clear();
    MAPS.clear();
    TUPLES.clear();
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::CacheKey;
    use crate::format::Format;

    #[test]
    fn pair_keys_are_ordered() {
        let a = CacheKey::pair(Format::Json, TypeId::of::<u8>(), TypeId::of::<u16>());
        let b = CacheKey::pair(Format::Json, TypeId::of::<u16>(), TypeId::of::<u8>());
        assert_ne!(a, b);
        assert_ne!(a, CacheKey::pair(Format::Jsv, TypeId::of::<u8>(), TypeId::of::<u16>()));
    }
}
