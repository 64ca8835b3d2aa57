use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::{error, fmt};

use crate::Reflect;
use crate::info::{AbstractInfo, DynamicInfo, EnumInfo, ListInfo, ListKind, MapInfo};
use crate::info::{OpaqueInfo, OptionInfo, PrimitiveInfo, StructInfo, TupleInfo, Type};

// -----------------------------------------------------------------------------
// TypeKind

/// The shape of a type, used to select its codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    Option,
    Enum,
    List,
    Map,
    Tuple,
    Struct,
    Opaque,
    Dynamic,
    Abstract,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive => f.pad("Primitive"),
            Self::Option => f.pad("Option"),
            Self::Enum => f.pad("Enum"),
            Self::List => f.pad("List"),
            Self::Map => f.pad("Map"),
            Self::Tuple => f.pad("Tuple"),
            Self::Struct => f.pad("Struct"),
            Self::Opaque => f.pad("Opaque"),
            Self::Dynamic => f.pad("Dynamic"),
            Self::Abstract => f.pad("Abstract"),
        }
    }
}

/// Returned by the `as_*` casts of [`TypeInfo`].
#[derive(Debug)]
pub struct TypeKindError {
    pub expected: TypeKind,
    pub received: TypeKind,
}

impl fmt::Display for TypeKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type kind mismatch: expected {}, received {}",
            self.expected, self.received
        )
    }
}

impl error::Error for TypeKindError {}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time description of a serializable type.
///
/// Get one through [`Typed::type_info`](crate::info::Typed::type_info) or
/// [`Reflect::reflect_type_info`].
#[derive(Debug, Clone)]
pub enum TypeInfo {
    Primitive(PrimitiveInfo),
    Option(OptionInfo),
    Enum(EnumInfo),
    List(ListInfo),
    Map(MapInfo),
    Tuple(TupleInfo),
    Struct(StructInfo),
    Opaque(OpaqueInfo),
    Dynamic(DynamicInfo),
    Abstract(AbstractInfo),
}

// Helper macro that implements type-safe accessor methods like `as_struct`.
macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        #[doc = concat!("Returns the [`", stringify!($info), "`], or an error for another kind.")]
        pub const fn $name(&self) -> Result<&$info, TypeKindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(TypeKindError {
                    expected: TypeKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

impl TypeInfo {
    impl_cast_method!(as_primitive: Primitive => PrimitiveInfo);
    impl_cast_method!(as_option: Option => OptionInfo);
    impl_cast_method!(as_enum: Enum => EnumInfo);
    impl_cast_method!(as_list: List => ListInfo);
    impl_cast_method!(as_map: Map => MapInfo);
    impl_cast_method!(as_tuple: Tuple => TupleInfo);
    impl_cast_method!(as_struct: Struct => StructInfo);
    impl_cast_method!(as_opaque: Opaque => OpaqueInfo);
    impl_cast_method!(as_dynamic: Dynamic => DynamicInfo);
    impl_cast_method!(as_abstract: Abstract => AbstractInfo);

    /// Returns the underlying [`Type`].
    pub const fn ty(&self) -> &Type {
        match self {
            Self::Primitive(info) => info.ty(),
            Self::Option(info) => info.ty(),
            Self::Enum(info) => info.ty(),
            Self::List(info) => info.ty(),
            Self::Map(info) => info.ty(),
            Self::Tuple(info) => info.ty(),
            Self::Struct(info) => info.ty(),
            Self::Opaque(info) => info.ty(),
            Self::Dynamic(info) => info.ty(),
            Self::Abstract(info) => info.ty(),
        }
    }

    #[inline]
    pub const fn type_id(&self) -> core::any::TypeId {
        self.ty().id()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty().name()
    }

    #[inline]
    pub fn module_path(&self) -> Option<&'static str> {
        self.ty().module_path()
    }

    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Primitive(_) => TypeKind::Primitive,
            Self::Option(_) => TypeKind::Option,
            Self::Enum(_) => TypeKind::Enum,
            Self::List(_) => TypeKind::List,
            Self::Map(_) => TypeKind::Map,
            Self::Tuple(_) => TypeKind::Tuple,
            Self::Struct(_) => TypeKind::Struct,
            Self::Opaque(_) => TypeKind::Opaque,
            Self::Dynamic(_) => TypeKind::Dynamic,
            Self::Abstract(_) => TypeKind::Abstract,
        }
    }

    /// Returns `true` if a value of this type can be built from text without
    /// knowing a more specific runtime type.
    #[inline]
    pub const fn is_concrete(&self) -> bool {
        !matches!(self, Self::Abstract(_) | Self::Dynamic(_))
    }

    /// Marker names attached to the type, see [`StructInfo::with_markers`].
    pub fn markers(&self) -> &[&'static str] {
        match self {
            Self::Struct(info) => info.markers(),
            _ => &[],
        }
    }

    /// Builds the default value of the type.
    ///
    /// Used for empty list slots and missing tuple fields. Returns `None`
    /// for abstract types and opaque types without a default.
    pub fn default_value(&self) -> Option<Box<dyn Any>> {
        match self {
            Self::Primitive(info) => Some((info.default_fn())()),
            Self::Option(info) => Some(info.none()),
            Self::Enum(info) => info.from_index(0),
            Self::List(info) => {
                let items = match info.capacity() {
                    Some(len) if info.kind() == ListKind::Array => {
                        let item = (info.item())();
                        (0..len)
                            .map(|_| item.default_value())
                            .collect::<Option<Vec<_>>>()?
                    }
                    _ => Vec::new(),
                };
                info.from_items(items).ok()
            }
            Self::Map(info) => info.from_entries(Vec::new()).ok(),
            Self::Tuple(info) => {
                let fields = info
                    .fields()
                    .iter()
                    .map(|field| field().default_value())
                    .collect::<Option<Vec<_>>>()?;
                info.from_fields(fields).ok()
            }
            Self::Struct(info) => Some((info.default_fn())()),
            Self::Opaque(info) => info.default_fn().map(|f| f()),
            Self::Dynamic(info) => Some((info.default_fn())()),
            Self::Abstract(_) => None,
        }
    }

    /// Returns `true` if `value` equals the default value of the type.
    ///
    /// Structs, opaque and abstract values are never considered default.
    pub fn is_default_value(&self, value: &dyn Any) -> bool {
        match self {
            Self::Primitive(info) => info.is_default(value),
            Self::Option(info) => info.get(value).is_none(),
            Self::Enum(info) => info.index_of(value) == Some(0),
            Self::List(info) => match info.kind() {
                ListKind::Array => {
                    let item = (info.item())();
                    let mut all = true;
                    info.for_each(value, &mut |v| all &= item.is_default_value(v));
                    all
                }
                _ => info.count(value) == 0,
            },
            Self::Map(info) => info.count(value) == 0,
            Self::Tuple(info) => info.fields().iter().enumerate().all(|(index, field)| {
                info.field(value, index)
                    .is_some_and(|v| field().is_default_value(v))
            }),
            Self::Dynamic(info) => info.is_null(value),
            Self::Struct(_) | Self::Opaque(_) | Self::Abstract(_) => false,
        }
    }

    /// Returns `true` if `value` is the null of a nullable type.
    pub fn is_null(&self, value: &dyn Any) -> bool {
        match self {
            Self::Option(info) => info.get(value).is_none(),
            Self::Dynamic(info) => info.is_null(value),
            _ => false,
        }
    }

    /// Converts a boxed value of this type into a [`Reflect`] object.
    ///
    /// Only structs carry this conversion.
    pub fn into_reflect(&self, value: Box<dyn Any>) -> Option<Box<dyn Reflect>> {
        match self {
            Self::Struct(info) => info.into_reflect(value),
            _ => None,
        }
    }

    /// Visits the descriptors of the types directly nested in this one.
    pub fn for_each_nested(&self, f: &mut dyn FnMut(&'static TypeInfo)) {
        match self {
            Self::Option(info) => f((info.some())()),
            Self::List(info) => f((info.item())()),
            Self::Map(info) => {
                f((info.key())());
                f((info.value())());
            }
            Self::Tuple(info) => info.fields().iter().for_each(|field| f(field())),
            Self::Struct(info) => info
                .members()
                .iter()
                .for_each(|member| f((member.type_info())())),
            Self::Primitive(_)
            | Self::Enum(_)
            | Self::Opaque(_)
            | Self::Dynamic(_)
            | Self::Abstract(_) => {}
        }
    }
}
