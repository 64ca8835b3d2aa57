use super::{ParseFn, WriteFn, extract_type_tag, parse_fn, resolve_parser, resolve_writer, write_fn};
use crate::info::{AbstractInfo, TypeInfo};
use crate::registry::{self, resolve_type_tag};
use crate::state::DynamicGuard;

/// Writes the concrete value behind the slot, tagged with its type.
pub(super) fn writer(info: &'static AbstractInfo) -> WriteFn {
    write_fn(move |out, value, cx| {
        let Some(concrete) = info.as_reflect(value) else {
            log::error!("writer of `{}` got another type", info.type_path());
            cx.primitives().write_null(out);
            return;
        };
        let _dynamic = DynamicGuard::set(true);
        resolve_writer(cx.format(), concrete.reflect_type_info())(out, concrete.as_any(), cx);
    })
}

/// Reads the implementor named by the leading type tag.
///
/// Text without a tag, or with a tag that does not resolve to an allowed
/// implementor, reads as null.
pub(super) fn parser(type_info: &'static TypeInfo) -> ParseFn {
    parse_fn(move |text, cx| {
        let p = cx.primitives();
        let text = text.trim();
        if p.is_null(text) {
            return Ok(None);
        }
        let attr = &cx.config().type_attr;
        let Some(tag) = extract_type_tag(text, p, attr) else {
            log::warn!(
                "`{}` needs a leading `{attr}` member, value skipped",
                type_info.type_path()
            );
            return Ok(None);
        };
        let Some(concrete) = resolve_type_tag(&tag, type_info, cx.config()) else {
            return Ok(None);
        };

        let implementor = registry::global()
            .read()
            .implementor(type_info.type_id(), concrete.type_id())
            .cloned();
        let Some(implementor) = implementor else {
            return Ok(None);
        };

        let Some(value) = resolve_parser(cx.format(), concrete)(text, cx)? else {
            return Ok(None);
        };
        match implementor.upcast(value) {
            Some(value) => Ok(Some(value)),
            None => {
                log::error!(
                    "`{}` could not be upcast to `{}`",
                    concrete.type_path(),
                    type_info.type_path()
                );
                Ok(None)
            }
        }
    })
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use crate::config::Config;
    use crate::derive::Typed;
    use crate::dispatch::{Context, resolve_parser, resolve_writer};
    use crate::format::Format;
    use crate::info::Typed as _;
    use crate::Reflect;

    trait Animal: Reflect {
        fn sound(&self) -> &str;
    }
    crate::impl_abstract!(dyn Animal);

    #[derive(Typed, Default)]
    struct Dog {
        name: String,
    }

    impl Animal for Dog {
        fn sound(&self) -> &str {
            "woof"
        }
    }

    #[derive(Typed, Default)]
    struct Stone {
        weight: u8,
    }

    fn register() {
        crate::registry::global()
            .write()
            .register_implementor::<Box<dyn Animal>, Dog>(|dog| Box::new(dog));
        crate::registry::register::<Stone>();
    }

    fn read(text: &str) -> Option<Box<dyn Animal>> {
        let config = Config::default();
        let cx = Context::new(Format::Json, &config);
        let parsed = resolve_parser(Format::Json, <Box<dyn Animal>>::type_info())(text, &cx).unwrap()?;
        parsed.downcast::<Box<dyn Animal>>().ok().map(|v| *v)
    }

    #[test]
    fn implementors_round_trip() {
        register();
        let config = Config::default();
        let cx = Context::new(Format::Json, &config);
        let animal: Box<dyn Animal> = Box::new(Dog { name: "rex".into() });

        let mut out = String::new();
        resolve_writer(Format::Json, <Box<dyn Animal>>::type_info())(&mut out, &animal, &cx);
        assert_eq!(
            out,
            r#"{"__type":"vc_jsv::dispatch::abstracts::tests::Dog","name":"rex"}"#
        );

        let back = read(&out).unwrap();
        assert_eq!(back.sound(), "woof");
        let dog = (*back).as_any().downcast_ref::<Dog>().unwrap();
        assert_eq!(dog.name, "rex");
    }

    #[test]
    fn untagged_or_foreign_text_reads_null() {
        register();
        assert!(read(r#"{"name":"rex"}"#).is_none());
        assert!(read(r#"{"__type":"vc_jsv::dispatch::abstracts::tests::Stone","weight":1}"#).is_none());
        assert!(read(r#"{"__type":"Evil.Type"}"#).is_none());
        assert!(read("null").is_none());
    }
}
