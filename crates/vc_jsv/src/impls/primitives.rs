use alloc::string::String;

use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, NonGenericTypeInfoCell};
use crate::info::{OptionInfo, PrimitiveInfo, PrimitiveKind, TypeInfo, TypePath, Typed};
use crate::time::DateTime;

// -----------------------------------------------------------------------------
// Scalars

macro_rules! impl_primitive {
    ($ty:ty, $kind:ident, $name:literal) => {
        impl_primitive!($ty, $kind, $name, $name, None);
    };
    ($ty:ty, $kind:ident, $path:literal, $name:literal, $module:expr) => {
        impl TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }

            #[inline]
            fn type_name() -> &'static str {
                $name
            }

            #[inline]
            fn type_ident() -> &'static str {
                $name
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                $module
            }
        }

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    TypeInfo::Primitive(PrimitiveInfo::new::<Self>(PrimitiveKind::$kind))
                })
            }
        }
    };
}

impl_primitive!(bool, Bool, "bool");
impl_primitive!(char, Char, "char");
impl_primitive!(i8, I8, "i8");
impl_primitive!(i16, I16, "i16");
impl_primitive!(i32, I32, "i32");
impl_primitive!(i64, I64, "i64");
impl_primitive!(i128, I128, "i128");
impl_primitive!(isize, Isize, "isize");
impl_primitive!(u8, U8, "u8");
impl_primitive!(u16, U16, "u16");
impl_primitive!(u32, U32, "u32");
impl_primitive!(u64, U64, "u64");
impl_primitive!(u128, U128, "u128");
impl_primitive!(usize, Usize, "usize");
impl_primitive!(f32, F32, "f32");
impl_primitive!(f64, F64, "f64");
impl_primitive!(String, String, "String");
impl_primitive!(uuid::Uuid, Guid, "uuid::Uuid", "Uuid", Some("uuid"));
impl_primitive!(
    DateTime,
    DateTime,
    "vc_jsv::time::DateTime",
    "DateTime",
    Some("vc_jsv::time")
);
impl_primitive!(
    chrono::DateTime<chrono::Utc>,
    UtcDateTime,
    "chrono::DateTime<chrono::Utc>",
    "DateTime<Utc>",
    Some("chrono")
);
impl_primitive!(
    chrono::DateTime<chrono::FixedOffset>,
    DateTimeOffset,
    "chrono::DateTime<chrono::FixedOffset>",
    "DateTime<FixedOffset>",
    Some("chrono")
);
impl_primitive!(
    chrono::NaiveDate,
    DateOnly,
    "chrono::NaiveDate",
    "NaiveDate",
    Some("chrono")
);
impl_primitive!(
    chrono::TimeDelta,
    TimeSpan,
    "chrono::TimeDelta",
    "TimeDelta",
    Some("chrono")
);

// -----------------------------------------------------------------------------
// Option

impl<T: TypePath> TypePath for Option<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| {
            crate::impls::concat(&["core::option::Option<", T::type_path(), ">"])
        })
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| crate::impls::concat(&["Option<", T::type_name(), ">"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Option"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("core::option")
    }
}

impl<T: Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Option(OptionInfo::new::<T>()))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::info::{PrimitiveKind, TypeKind, TypePath, Typed};

    #[test]
    fn primitive_kinds() {
        let kind = |info: &crate::info::TypeInfo| info.as_primitive().map(|p| p.kind()).ok();
        assert_eq!(kind(u8::type_info()), Some(PrimitiveKind::U8));
        assert_eq!(kind(uuid::Uuid::type_info()), Some(PrimitiveKind::Guid));
        assert_eq!(
            kind(chrono::TimeDelta::type_info()),
            Some(PrimitiveKind::TimeSpan)
        );
        assert_eq!(<uuid::Uuid as TypePath>::module_path(), Some("uuid"));
    }

    #[test]
    fn option_names() {
        assert_eq!(<Option<i32> as TypePath>::type_name(), "Option<i32>");
        assert_eq!(
            <Option<i32> as TypePath>::type_path(),
            "core::option::Option<i32>"
        );
        assert_eq!(<Option<i32> as Typed>::type_info().kind(), TypeKind::Option);
    }
}
