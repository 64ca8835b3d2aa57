use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;

use crate::Reflect;
use crate::info::{DefaultFn, InfoFn, TestFn, Type, Typed};

// -----------------------------------------------------------------------------
// MemberInfo

/// Reads a member out of an erased instance.
pub type GetMemberFn = fn(&dyn Any) -> Option<&dyn Any>;

/// Moves a boxed value into a member, returns `false` on a type mismatch.
pub type SetMemberFn = fn(&mut dyn Any, Box<dyn Any>) -> bool;

/// Called before each member is assigned, and for unknown members.
///
/// Receives the instance, the member name and the raw text, and may return
/// replacement text.
pub type OnDeserializingFn = fn(&mut dyn Any, &str, &str) -> Option<String>;

/// Called after an instance was fully read.
pub type OnDeserializedFn = fn(&mut dyn Any);

/// One serializable member of a struct.
#[derive(Debug, Clone)]
pub struct MemberInfo {
    name: &'static str,
    field: &'static str,
    fixed_name: bool,
    type_info: InfoFn,
    get: GetMemberFn,
    set: SetMemberFn,
    should_serialize: Option<TestFn>,
}

impl MemberInfo {
    /// Creates a member named after its field.
    pub fn new<T: Typed>(field: &'static str, get: GetMemberFn, set: SetMemberFn) -> Self {
        Self {
            name: field,
            field,
            fixed_name: false,
            type_info: T::type_info,
            get,
            set,
            should_serialize: None,
        }
    }

    /// Overrides the written name.
    ///
    /// A renamed member is not affected by the text-case policy.
    #[inline]
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self.fixed_name = true;
        self
    }

    /// Sets a predicate deciding per instance whether the member is written.
    #[inline]
    pub fn with_should_serialize(mut self, should_serialize: TestFn) -> Self {
        self.should_serialize = Some(should_serialize);
        self
    }

    /// The written name of the member.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The name of the Rust field.
    #[inline]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Returns `true` if the name was given explicitly.
    #[inline]
    pub const fn fixed_name(&self) -> bool {
        self.fixed_name
    }

    #[inline]
    pub fn type_info(&self) -> InfoFn {
        self.type_info
    }

    #[inline]
    pub fn get<'a>(&self, instance: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.get)(instance)
    }

    #[inline]
    pub fn set(&self, instance: &mut dyn Any, value: Box<dyn Any>) -> bool {
        (self.set)(instance, value)
    }

    #[inline]
    pub fn should_serialize(&self, instance: &dyn Any) -> bool {
        self.should_serialize.is_none_or(|f| f(instance))
    }
}

// -----------------------------------------------------------------------------
// StructInfo

/// Descriptor of a struct with named members.
///
/// Built by [`#[derive(Typed)]`](crate::derive::Typed).
#[derive(Debug, Clone)]
pub struct StructInfo {
    ty: Type,
    members: Box<[MemberInfo]>,
    default: DefaultFn,
    into_reflect: fn(Box<dyn Any>) -> Option<Box<dyn Reflect>>,
    lenient: bool,
    markers: Box<[&'static str]>,
    on_deserializing: Option<OnDeserializingFn>,
    on_deserialized: Option<OnDeserializedFn>,
}

impl StructInfo {
    pub fn new<T: Reflect + Typed + Default>(members: &[MemberInfo]) -> Self {
        Self {
            ty: Type::of::<T>(),
            members: members.into(),
            default: crate::info::default_of::<T>,
            into_reflect: into_reflect::<T>,
            lenient: false,
            markers: Box::new([]),
            on_deserializing: None,
            on_deserialized: None,
        }
    }

    /// Always match member names leniently, whatever the config says.
    #[inline]
    pub fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Attaches marker names checked by the runtime-type allow-list.
    #[inline]
    pub fn with_markers(mut self, markers: &[&'static str]) -> Self {
        self.markers = markers.into();
        self
    }

    #[inline]
    pub fn with_on_deserializing(mut self, f: OnDeserializingFn) -> Self {
        self.on_deserializing = Some(f);
        self
    }

    #[inline]
    pub fn with_on_deserialized(mut self, f: OnDeserializedFn) -> Self {
        self.on_deserialized = Some(f);
        self
    }

    crate::info::impl_type_fn!(ty);

    #[inline]
    pub fn members(&self) -> &[MemberInfo] {
        &self.members
    }

    #[inline]
    pub fn default_fn(&self) -> DefaultFn {
        self.default
    }

    #[inline]
    pub const fn is_lenient(&self) -> bool {
        self.lenient
    }

    #[inline]
    pub fn markers(&self) -> &[&'static str] {
        &self.markers
    }

    #[inline]
    pub fn on_deserializing(&self) -> Option<OnDeserializingFn> {
        self.on_deserializing
    }

    #[inline]
    pub fn on_deserialized(&self) -> Option<OnDeserializedFn> {
        self.on_deserialized
    }

    #[inline]
    pub fn into_reflect(&self, value: Box<dyn Any>) -> Option<Box<dyn Reflect>> {
        (self.into_reflect)(value)
    }
}

fn into_reflect<T: Reflect>(value: Box<dyn Any>) -> Option<Box<dyn Reflect>> {
    let value = value.downcast::<T>().ok()?;
    Some(value)
}
