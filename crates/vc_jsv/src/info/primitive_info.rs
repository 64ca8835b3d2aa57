use core::any::Any;
use core::fmt;

use crate::info::{DefaultFn, TestFn, Type, TypePath};

// -----------------------------------------------------------------------------
// PrimitiveKind

/// The built-in scalar types the dispatch engine writes and parses directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
    String,
    /// [`uuid::Uuid`].
    Guid,
    /// The kind-aware [`DateTime`](crate::time::DateTime).
    DateTime,
    /// `chrono::DateTime<Utc>`.
    UtcDateTime,
    /// `chrono::DateTime<FixedOffset>`.
    DateTimeOffset,
    /// `chrono::NaiveDate`.
    DateOnly,
    /// `chrono::TimeDelta`.
    TimeSpan,
}

impl PrimitiveKind {
    /// Returns the name used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "string",
            Self::Guid => "guid",
            Self::DateTime => "date",
            Self::UtcDateTime => "utc date",
            Self::DateTimeOffset => "date offset",
            Self::DateOnly => "date only",
            Self::TimeSpan => "time span",
        }
    }

    /// Returns `true` for the integer and floating point kinds.
    pub const fn is_number(self) -> bool {
        !matches!(
            self,
            Self::Bool
                | Self::Char
                | Self::String
                | Self::Guid
                | Self::DateTime
                | Self::UtcDateTime
                | Self::DateTimeOffset
                | Self::DateOnly
                | Self::TimeSpan
        )
    }

    /// Returns `true` for the kinds JSON writes inside quotes.
    pub const fn is_quoted_in_json(self) -> bool {
        matches!(
            self,
            Self::Char
                | Self::String
                | Self::Guid
                | Self::DateTime
                | Self::UtcDateTime
                | Self::DateTimeOffset
                | Self::DateOnly
                | Self::TimeSpan
        )
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

// -----------------------------------------------------------------------------
// PrimitiveInfo

/// Descriptor of a built-in scalar type.
#[derive(Debug, Clone)]
pub struct PrimitiveInfo {
    ty: Type,
    kind: PrimitiveKind,
    default: DefaultFn,
    is_default: TestFn,
}

impl PrimitiveInfo {
    /// Creates the descriptor of `T`, which must be the type `kind` names.
    pub fn new<T: TypePath + Default + PartialEq + Any>(kind: PrimitiveKind) -> Self {
        Self {
            ty: Type::of::<T>(),
            kind,
            default: crate::info::default_of::<T>,
            is_default: crate::info::is_default_of::<T>,
        }
    }

    crate::info::impl_type_fn!(ty);

    #[inline]
    pub const fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    #[inline]
    pub fn default_fn(&self) -> DefaultFn {
        self.default
    }

    #[inline]
    pub fn is_default(&self, value: &dyn Any) -> bool {
        (self.is_default)(value)
    }
}
