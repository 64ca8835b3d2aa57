/// Implements [`Typed`] for `Box<dyn Trait>`, making the trait object an
/// abstract slot.
///
/// The trait must have [`Reflect`] as a supertrait. Values are written with
/// their `__type` tag; reading resolves the tag through the type registry
/// and requires the concrete type to be registered as an implementor, see
/// [`TypeRegistry::register_implementor`] or `#[jsv(implements(Trait))]`.
///
/// # Examples
///
/// ```
/// use vc_jsv::{Reflect, impl_abstract};
/// use vc_jsv::info::{TypeKind, Typed};
///
/// pub trait Shape: Reflect {
///     fn area(&self) -> f64;
/// }
///
/// impl_abstract!(dyn Shape);
///
/// assert_eq!(<Box<dyn Shape>>::type_info().kind(), TypeKind::Abstract);
/// ```
///
/// [`Typed`]: crate::info::Typed
/// [`Reflect`]: crate::Reflect
/// [`TypeRegistry::register_implementor`]: crate::registry::TypeRegistry::register_implementor
#[macro_export]
macro_rules! impl_abstract {
    (dyn $trait:ident) => {
        impl $crate::info::TypePath for ::std::boxed::Box<dyn $trait> {
            #[inline]
            fn type_path() -> &'static str {
                ::core::concat!("Box<dyn ", ::core::module_path!(), "::", ::core::stringify!($trait), ">")
            }

            #[inline]
            fn type_name() -> &'static str {
                ::core::concat!("Box<dyn ", ::core::stringify!($trait), ">")
            }

            #[inline]
            fn type_ident() -> &'static str {
                ::core::stringify!($trait)
            }

            #[inline]
            fn module_path() -> ::core::option::Option<&'static str> {
                ::core::option::Option::Some(::core::module_path!())
            }
        }

        impl $crate::info::Typed for ::std::boxed::Box<dyn $trait> {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::impls::NonGenericTypeInfoCell =
                    $crate::impls::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    $crate::info::TypeInfo::Abstract($crate::info::AbstractInfo::new::<Self>(
                        |value| {
                            let value = value.downcast_ref::<::std::boxed::Box<dyn $trait>>()?;
                            let value: &dyn $crate::Reflect = &**value;
                            ::core::option::Option::Some(value)
                        },
                    ))
                })
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use crate::Reflect;
    use crate::info::{TypePath, Typed};

    trait Named: Reflect {}

    impl Named for u8 {}

    crate::impl_abstract!(dyn Named);

    #[test]
    fn abstract_views_concrete_value() {
        assert_eq!(<Box<dyn Named>>::type_name(), "Box<dyn Named>");

        let info = <Box<dyn Named>>::type_info().as_abstract().unwrap();
        let value: Box<dyn Named> = Box::new(5_u8);
        let inner = info.as_reflect(&value).unwrap();
        assert_eq!(inner.reflect_type_info().type_path(), "u8");
        assert_eq!(inner.as_any().downcast_ref::<u8>(), Some(&5));
    }
}
