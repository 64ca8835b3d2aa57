//! The closed set of types a `__type` tag may name.
//!
//! Reading a tag never searches the program for a type: the name is looked
//! up in the process-wide [`TypeRegistry`] (or handed to the configured
//! `type_finder`), then checked against the runtime-type allow-list of the
//! active [`Config`](crate::config::Config) by [`resolve_type_tag`].
//!
//! The global registry starts with the scalar types and
//! [`Value`](crate::value::Value). With the `auto_register` feature, the
//! registrations submitted by `#[jsv(auto_register)]` and
//! `#[jsv(implements(..))]` are added when it is first used.
//!
//! ```
//! use vc_jsv::registry;
//!
//! #[derive(vc_jsv::derive::Typed, Default)]
//! struct Point {
//!     x: i32,
//! }
//!
//! registry::global().write().register::<Point>();
//! assert!(registry::global().read().find("Point").is_some());
//! ```

// -----------------------------------------------------------------------------
// Modules

mod allow;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use allow::{TYPE_TAG, is_runtime_type_allowed, resolve_type_tag};
pub use type_registry::{Implementor, TypeRegistry, TypeRegistryArc, UpcastFn};

use std::sync::LazyLock;

static GLOBAL: LazyLock<TypeRegistryArc> = LazyLock::new(|| {
    let mut registry = TypeRegistry::new();
    registry.auto_register();
    log::debug!("type registry created with {} types", registry.iter().len());
    TypeRegistryArc {
        internal: alloc::sync::Arc::new(std::sync::RwLock::new(registry)),
    }
});

/// Returns the process-wide registry.
#[inline]
pub fn global() -> &'static TypeRegistryArc {
    &GLOBAL
}

/// Registers `T` in the process-wide registry.
#[inline]
pub fn register<T: crate::info::Typed>() {
    global().write().register::<T>();
}
