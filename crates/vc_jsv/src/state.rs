//! Per-thread call state.
//!
//! Each thread carries its own recursion depth and two writing flags. They
//! are only changed through guards, which restore the previous value on drop,
//! so an early return or a panic mid-traversal cannot leave the state of the
//! thread corrupted for its next call.

use core::cell::Cell;
use core::marker::PhantomData;

std::thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
    static WRITING_KEY: Cell<bool> = const { Cell::new(false) };
    static WRITING_DYNAMIC: Cell<bool> = const { Cell::new(false) };
}

/// Returns the current nesting depth of this thread.
#[inline]
pub fn depth() -> usize {
    DEPTH.get()
}

/// Returns `true` while a map key is being written.
///
/// Scalar writers use it to quote keys that would not be quoted as values.
#[inline]
pub fn is_writing_key() -> bool {
    WRITING_KEY.get()
}

/// Returns `true` while a value whose concrete type differs from its declared
/// type is being written, so its struct writer emits a `__type` tag.
#[inline]
pub fn is_writing_dynamic() -> bool {
    WRITING_DYNAMIC.get()
}

// -----------------------------------------------------------------------------
// DepthGuard

/// Counts one level of nesting while alive.
#[must_use]
pub struct DepthGuard {
    _marker: PhantomData<*const ()>,
}

impl DepthGuard {
    /// Enters one level, or returns `None` when `max_depth` is already
    /// reached.
    pub fn enter(max_depth: usize) -> Option<Self> {
        let depth = DEPTH.get();
        if depth >= max_depth {
            log::warn!("maximum depth {max_depth} reached, value skipped");
            return None;
        }
        DEPTH.set(depth + 1);
        Some(Self {
            _marker: PhantomData,
        })
    }
}

impl Drop for DepthGuard {
    #[inline]
    fn drop(&mut self) {
        DEPTH.set(DEPTH.get().saturating_sub(1));
    }
}

// -----------------------------------------------------------------------------
// Flag guards

macro_rules! flag_guard {
    ($(#[$meta:meta])* $name:ident, $cell:ident) => {
        $(#[$meta])*
        #[must_use]
        pub struct $name {
            previous: bool,
            _marker: PhantomData<*const ()>,
        }

        impl $name {
            /// Sets the flag to `value` until the guard drops.
            #[inline]
            pub fn set(value: bool) -> Self {
                Self {
                    previous: $cell.replace(value),
                    _marker: PhantomData,
                }
            }
        }

        impl Drop for $name {
            #[inline]
            fn drop(&mut self) {
                $cell.set(self.previous);
            }
        }
    };
}

flag_guard!(
    /// Marks that a map key is being written.
    KeyGuard,
    WRITING_KEY
);

flag_guard!(
    /// Marks that a runtime-typed value is being written.
    DynamicGuard,
    WRITING_DYNAMIC
);

// -----------------------------------------------------------------------------
// Tests
