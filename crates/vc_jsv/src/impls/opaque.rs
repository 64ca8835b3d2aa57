use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;
use core::fmt::Write;
use core::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;

use crate::Result;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{OpaqueInfo, TypeInfo, TypePath, Typed};

macro_rules! impl_opaque {
    ($ty:ty, $path:literal, $name:literal, $module:literal, $info:expr) => {
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
                Some($module)
            }
        }

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::Opaque($info))
            }
        }
    };
}

impl_opaque!(
    IpAddr,
    "core::net::IpAddr",
    "IpAddr",
    "core::net",
    OpaqueInfo::new::<IpAddr>()
);
impl_opaque!(
    Ipv4Addr,
    "core::net::Ipv4Addr",
    "Ipv4Addr",
    "core::net",
    OpaqueInfo::new::<Ipv4Addr>().with_default(|| Box::new(Ipv4Addr::UNSPECIFIED))
);
impl_opaque!(
    Ipv6Addr,
    "core::net::Ipv6Addr",
    "Ipv6Addr",
    "core::net",
    OpaqueInfo::new::<Ipv6Addr>().with_default(|| Box::new(Ipv6Addr::UNSPECIFIED))
);
impl_opaque!(
    SocketAddr,
    "core::net::SocketAddr",
    "SocketAddr",
    "core::net",
    OpaqueInfo::new::<SocketAddr>()
);
impl_opaque!(
    PathBuf,
    "std::path::PathBuf",
    "PathBuf",
    "std::path",
    OpaqueInfo::with_fns::<PathBuf>(path_to_text, path_from_text)
        .with_default(crate::info::default_of::<PathBuf>)
);

fn path_to_text(value: &dyn Any, out: &mut String) {
    if let Some(path) = value.downcast_ref::<PathBuf>() {
        let _ = write!(out, "{}", path.display());
    }
}

fn path_from_text(text: &str) -> Result<Box<dyn Any>> {
    Ok(Box::new(PathBuf::from(text)))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::net::Ipv4Addr;
    use std::path::PathBuf;

    use crate::info::Typed;

    #[test]
    fn ip_text_round_trip() {
        let info = Ipv4Addr::type_info().as_opaque().unwrap();
        let mut out = String::new();
        info.to_text(&Ipv4Addr::LOCALHOST, &mut out);
        assert_eq!(out, "127.0.0.1");

        let back = info.from_text(&out).unwrap();
        assert_eq!(back.downcast_ref::<Ipv4Addr>(), Some(&Ipv4Addr::LOCALHOST));
        assert!(info.from_text("not-an-ip").is_err());
    }

    #[test]
    fn path_text() {
        let info = PathBuf::type_info().as_opaque().unwrap();
        let back = info.from_text("/tmp/a b").unwrap();
        assert_eq!(back.downcast_ref::<PathBuf>(), Some(&PathBuf::from("/tmp/a b")));
        assert!(info.default_fn().is_some());
    }
}
