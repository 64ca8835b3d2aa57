use alloc::sync::Arc;
use core::fmt::Debug;
use core::hash::Hash;

use arc_swap::ArcSwap;

use crate::hash::{FixedHashState, HashMap};

// -----------------------------------------------------------------------------
// SnapshotMap

/// A map that is never mutated in place.
///
/// Every insertion clones the current snapshot, adds the entry, and swaps the
/// new snapshot in with a compare-and-swap, retrying when another thread won
/// the race. Readers load the current snapshot without taking a lock and
/// always see either the old or the new complete map.
///
/// Two threads missing the same key may both build a value; the first one to
/// publish wins and the other value is dropped, so callers must only store
/// values that are interchangeable.
///
/// # Examples
///
/// ```
/// use vc_utils::SnapshotMap;
///
/// let map = SnapshotMap::<u32, &str>::new();
/// assert_eq!(map.get_or_insert_with(1, || "one"), "one");
/// // The existing entry wins, the closure is not called.
/// assert_eq!(map.get_or_insert_with(1, || unreachable!()), "one");
/// assert_eq!(map.len(), 1);
/// ```
pub struct SnapshotMap<K, V> {
    snapshot: ArcSwap<HashMap<K, V, FixedHashState>>,
}

impl<K, V> SnapshotMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(HashMap::with_hasher(FixedHashState)),
        }
    }

    /// Returns a clone of the value stored for `key`.
    #[inline]
    pub fn get(&self, key: &K) -> Option<V> {
        self.snapshot.load().get(key).cloned()
    }

    /// Returns the value for `key`, building and publishing it on a miss.
    ///
    /// `f` runs outside of any lock and may itself call back into this map.
    pub fn get_or_insert_with(&self, key: K, f: impl FnOnce() -> V) -> V {
        if let Some(value) = self.get(&key) {
            return value;
        }

        let built = f();
        let mut published = None;

        self.snapshot.rcu(|current| {
            if let Some(existing) = current.get(&key) {
                published = Some(existing.clone());
                return Arc::clone(current);
            }
            let mut next = HashMap::clone(current);
            next.insert(key.clone(), built.clone());
            published = Some(built.clone());
            Arc::new(next)
        });

        published.unwrap_or(built)
    }

    /// Replaces the value for `key` unconditionally.
    pub fn insert(&self, key: K, value: V) {
        self.snapshot.rcu(|current| {
            let mut next = HashMap::clone(current);
            next.insert(key.clone(), value.clone());
            next
        });
    }

    /// Removes `key`, returning `true` if it was present.
    pub fn remove(&self, key: &K) -> bool {
        let mut removed = false;
        self.snapshot.rcu(|current| {
            removed = current.contains_key(key);
            if !removed {
                return Arc::clone(current);
            }
            let mut next = HashMap::clone(current);
            next.remove(key);
            Arc::new(next)
        });
        removed
    }

    /// Returns `true` if the current snapshot contains `key`.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.snapshot.load().contains_key(key)
    }

    /// Counts the entries of the current snapshot that match `pred`.
    pub fn count_keys(&self, mut pred: impl FnMut(&K) -> bool) -> usize {
        self.snapshot.load().keys().filter(|k| pred(k)).count()
    }

    /// Returns the number of entries in the current snapshot.
    #[inline]
    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.snapshot.load().is_empty()
    }

    /// Swaps in an empty snapshot.
    pub fn clear(&self) {
        self.snapshot
            .store(Arc::new(HashMap::with_hasher(FixedHashState)));
    }
}

impl<K, V> Default for SnapshotMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Debug, V: Debug> Debug for SnapshotMap<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&**self.snapshot.load(), f)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::SnapshotMap;
    use alloc::sync::Arc;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn racing_inserts_publish_one_value() {
        const THREADS: usize = 8;

        let map = Arc::new(SnapshotMap::<&'static str, Arc<usize>>::new());
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|n| {
                let map = Arc::clone(&map);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    map.get_or_insert_with("key", || Arc::new(n))
                })
            })
            .collect();

        let results: Vec<Arc<usize>> = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect();

        assert_eq!(map.len(), 1);
        let winner = map.get(&"key").unwrap();
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &winner)));
    }

    #[test]
    fn pair_keys_do_not_alias() {
        let map = SnapshotMap::<(u8, u8), &str>::new();
        map.get_or_insert_with((1, 2), || "ab");
        map.get_or_insert_with((2, 1), || "ba");
        assert_eq!(map.get(&(1, 2)), Some("ab"));
        assert_eq!(map.get(&(2, 1)), Some("ba"));
        assert_eq!(map.count_keys(|k| k.0 == 1), 1);
    }

    #[test]
    fn clear_swaps_in_empty_snapshot() {
        let map = SnapshotMap::<u8, u8>::new();
        map.insert(1, 1);
        map.insert(1, 2);
        assert_eq!(map.get(&1), Some(2));
        map.clear();
        assert!(!map.contains_key(&1));
    }
}
