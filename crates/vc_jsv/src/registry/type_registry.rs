use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use vc_utils::TypeIdMap;
use vc_utils::hash::{HashMap, HashSet};

use crate::info::{TypeInfo, Typed};

// -----------------------------------------------------------------------------
// Implementor

/// Moves a boxed concrete value into a boxed abstract slot value.
pub type UpcastFn = Arc<dyn Fn(Box<dyn Any>) -> Option<Box<dyn Any>> + Send + Sync>;

/// A concrete type registered as an implementor of an abstract slot.
#[derive(Clone)]
pub struct Implementor {
    info: &'static TypeInfo,
    upcast: UpcastFn,
}

impl Implementor {
    /// The descriptor of the concrete type.
    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        self.info
    }

    /// Turns a boxed concrete value into the boxed abstract value, `None` if
    /// `value` is not of the concrete type.
    #[inline]
    pub fn upcast(&self, value: Box<dyn Any>) -> Option<Box<dyn Any>> {
        (self.upcast)(value)
    }
}

impl fmt::Debug for Implementor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Implementor")
            .field(&self.info.type_path())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistry

/// The types a `__type` tag may name.
///
/// Runtime type resolution only ever instantiates types found here (or
/// returned by a configured type finder), so the registry is the closed set
/// of types text can ask for.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use vc_jsv::registry::TypeRegistry;
///
/// let mut registry = TypeRegistry::empty();
/// registry.register::<Vec<Option<u8>>>();
///
/// // Nested types are registered too.
/// assert!(registry.contains(TypeId::of::<Option<u8>>()));
/// assert_eq!(registry.get_with_type_path("u8").unwrap().type_name(), "u8");
/// ```
pub struct TypeRegistry {
    type_info_table: TypeIdMap<&'static TypeInfo>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
    implementors: TypeIdMap<Vec<Implementor>>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn empty() -> Self {
        Self {
            type_info_table: TypeIdMap::new(),
            type_path_to_id: HashMap::default(),
            type_name_to_id: HashMap::default(),
            ambiguous_names: HashSet::default(),
            implementors: TypeIdMap::new(),
        }
    }

    /// Creates a registry holding the scalar types and [`Value`].
    ///
    /// [`Value`]: crate::value::Value
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<u128>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<i128>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry.register::<uuid::Uuid>();
        registry.register::<crate::time::DateTime>();
        registry.register::<crate::value::Value>();
        registry
    }

    /// Registers `T` and, recursively, the types nested in it.
    ///
    /// Registering a type twice does nothing.
    #[inline]
    pub fn register<T: Typed>(&mut self) {
        self.register_info(T::type_info());
    }

    /// Registers a descriptor and the descriptors nested in it.
    pub fn register_info(&mut self, info: &'static TypeInfo) {
        if !self.type_info_table.try_insert(info.type_id(), info) {
            return;
        }

        let name = info.type_name();
        if !self.ambiguous_names.contains(name) {
            if self.type_name_to_id.remove(name).is_some() {
                self.ambiguous_names.insert(name);
            } else {
                self.type_name_to_id.insert(name, info.type_id());
            }
        }
        self.type_path_to_id.insert(info.type_path(), info.type_id());

        info.for_each_nested(&mut |nested| self.register_info(nested));
    }

    /// Registers `T` as an implementor of the abstract slot `A`, usually a
    /// `Box<dyn Trait>`.
    ///
    /// `upcast` moves a `T` into the slot. Both types are registered.
    ///
    /// ```
    /// use vc_jsv::registry::TypeRegistry;
    /// use vc_jsv::{Reflect, impl_abstract};
    ///
    /// pub trait Named: Reflect {}
    /// impl Named for u8 {}
    /// impl_abstract!(dyn Named);
    ///
    /// let mut registry = TypeRegistry::empty();
    /// registry.register_implementor::<Box<dyn Named>, u8>(|v| Box::new(v));
    /// assert_eq!(registry.implementors_of::<Box<dyn Named>>().len(), 1);
    /// ```
    pub fn register_implementor<A: Typed, T: Typed>(&mut self, upcast: fn(T) -> A) {
        self.register::<A>();
        self.register::<T>();

        let list = self
            .implementors
            .get_or_insert(TypeId::of::<A>(), Vec::new);
        if list.iter().any(|i| i.info.type_id() == TypeId::of::<T>()) {
            return;
        }
        list.push(Implementor {
            info: T::type_info(),
            upcast: Arc::new(move |value: Box<dyn Any>| -> Option<Box<dyn Any>> {
                let value = value.downcast::<T>().ok()?;
                Some(Box::new(upcast(*value)))
            }),
        });
    }

    /// Runs the registrations submitted by `#[jsv(auto_register)]` and
    /// `#[jsv(implements(..))]`.
    ///
    /// Returns `false` when the `auto_register` feature is disabled.
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            crate::__macro_exports::auto_register::__register_types(self);
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_info_table.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.type_info_table.get(&type_id).copied()
    }

    /// Finds a type by its full [type path](crate::info::TypePath::type_path).
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&'static TypeInfo> {
        self.type_path_to_id
            .get(type_path)
            .and_then(|id| self.get(*id))
    }

    /// Finds a type by its short [type name](crate::info::TypePath::type_name).
    ///
    /// Returns `None` if the name is ambiguous.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&'static TypeInfo> {
        self.type_name_to_id
            .get(type_name)
            .and_then(|id| self.get(*id))
    }

    /// Finds a type by full path, then by unambiguous short name.
    pub fn find(&self, name: &str) -> Option<&'static TypeInfo> {
        self.get_with_type_path(name)
            .or_else(|| self.get_with_type_name(name))
    }

    /// Returns `true` if two registered types share the short name.
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// The implementors registered for the abstract slot `A`.
    pub fn implementors_of<A: Typed>(&self) -> &[Implementor] {
        self.implementors_of_id(TypeId::of::<A>())
    }

    /// The implementors registered for the abstract slot `abstract_id`.
    pub fn implementors_of_id(&self, abstract_id: TypeId) -> &[Implementor] {
        self.implementors
            .get(&abstract_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the registration of `concrete_id` as an implementor of
    /// `abstract_id`.
    pub fn implementor(&self, abstract_id: TypeId, concrete_id: TypeId) -> Option<&Implementor> {
        self.implementors_of_id(abstract_id)
            .iter()
            .find(|i| i.info.type_id() == concrete_id)
    }

    /// Iterates over the registered descriptors.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'static TypeInfo> + '_ {
        self.type_info_table.values().copied()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

/// A shareable [`TypeRegistry`] behind a read-write lock.
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.read().type_path_to_id.keys())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use core::any::TypeId;

    use super::TypeRegistry;
    use crate::Reflect;
    use crate::info::TypePath;

    trait Marker: Reflect {}
    impl Marker for u16 {}
    impl Marker for String {}
    crate::impl_abstract!(dyn Marker);

    #[test]
    fn registers_nested_types() {
        let mut registry = TypeRegistry::empty();
        registry.register::<BTreeMap<String, Option<i32>>>();
        assert!(registry.contains(TypeId::of::<String>()));
        assert!(registry.contains(TypeId::of::<Option<i32>>()));
        assert!(registry.contains(TypeId::of::<i32>()));
        assert_eq!(registry.iter().len(), 4);
    }

    #[test]
    fn short_names_can_be_ambiguous() {
        mod a {
            #[derive(crate::derive::Typed, Default)]
            pub struct Item {}
        }
        mod b {
            #[derive(crate::derive::Typed, Default)]
            pub struct Item {}
        }

        let mut registry = TypeRegistry::empty();
        registry.register::<a::Item>();
        assert!(registry.get_with_type_name("Item").is_some());
        registry.register::<b::Item>();
        assert!(registry.is_ambiguous("Item"));
        assert!(registry.get_with_type_name("Item").is_none());
        assert!(registry.find(<b::Item as TypePath>::type_path()).is_some());
    }

    #[test]
    fn implementors_upcast() {
        let mut registry = TypeRegistry::empty();
        registry.register_implementor::<Box<dyn Marker>, u16>(|v| Box::new(v));
        registry.register_implementor::<Box<dyn Marker>, u16>(|v| Box::new(v));
        registry.register_implementor::<Box<dyn Marker>, String>(|v| Box::new(v));
        assert_eq!(registry.implementors_of::<Box<dyn Marker>>().len(), 2);

        let id = TypeId::of::<Box<dyn Marker>>();
        let implementor = registry.implementor(id, TypeId::of::<u16>()).unwrap();
        let slot = implementor.upcast(Box::new(9_u16)).unwrap();
        let slot = slot.downcast::<Box<dyn Marker>>().unwrap();
        assert_eq!(slot.as_any().downcast_ref::<u16>(), Some(&9));
        assert!(implementor.upcast(Box::new(1_u8)).is_none());
    }
}
