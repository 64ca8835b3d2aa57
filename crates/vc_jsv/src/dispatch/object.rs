use alloc::boxed::Box;

use super::{LazyParser, LazyWriter, ParseFn, WriteFn, parse_fn, write_fn};
use crate::access::TypeDescriptor;
use crate::format::{Escape, Format};
use crate::info::{StructInfo, TypeInfo};
use crate::registry::resolve_type_tag;
use crate::state::{self, DepthGuard, DynamicGuard};
use crate::Error;

// -----------------------------------------------------------------------------
// Writer

/// Writes a struct as a map of its members in declaration order.
///
/// A type tag named by `type_attr` comes first when `include_type_info` is
/// set, or when the struct is written into a slot of another type, unless
/// `exclude_type_info` is set. Members matching `exclude_types` or
/// `exclude_property_references` are left out.
pub(super) fn writer(format: Format, info: &'static StructInfo) -> WriteFn {
    let descriptor = TypeDescriptor::of_struct(info);
    let writers: Box<[LazyWriter]> = descriptor
        .declared()
        .map(|a| LazyWriter::new(format, a.member().type_info()))
        .collect();

    write_fn(move |out, value, cx| {
        let p = cx.primitives();
        let config = cx.config();
        let Some(_depth) = DepthGuard::enter(config.max_depth) else {
            p.write_null(out);
            return;
        };

        out.push('{');
        let mut first = true;

        if (config.include_type_info || state::is_writing_dynamic()) && !config.exclude_type_info {
            p.write_string(out, &config.type_attr, Escape::empty());
            out.push(':');
            p.write_string(out, info.type_path(), Escape::empty());
            first = false;
        }

        let _dynamic = DynamicGuard::set(false);
        for (accessor, writer) in descriptor.declared().zip(writers.iter()) {
            if !accessor.should_serialize(value)
                || config.is_member_excluded(info, accessor.name(), accessor.type_info())
            {
                continue;
            }
            let Some(member) = accessor.get(value) else {
                log::error!(
                    "member `{}` of `{}` could not be read",
                    accessor.name(),
                    info.type_path()
                );
                continue;
            };
            if !config.include_null_values && accessor.type_info().is_null(member) {
                continue;
            }
            if accessor.is_enum()
                && !config.include_default_enums
                && accessor.is_default(member)
            {
                continue;
            }
            if config.exclude_default_values && accessor.is_default(member) {
                continue;
            }

            if !first {
                out.push(',');
            }
            first = false;
            p.write_string(out, accessor.cased_name(config.text_case), Escape::empty());
            out.push(':');
            writer.get()(out, member, cx);
        }
        out.push('}');
    })
}

// -----------------------------------------------------------------------------
// Parser

/// Reads a struct from a map.
///
/// Starts from the default instance and assigns the members found. Unknown
/// members are skipped. A member that fails is reported to
/// `on_deserialization_error`, then either aborts the read under
/// `throw_on_error` or is left at its default.
pub(super) fn parser(
    format: Format,
    info: &'static StructInfo,
    type_info: &'static TypeInfo,
) -> ParseFn {
    let descriptor = TypeDescriptor::of_struct(info);
    let parsers: Box<[LazyParser]> = descriptor
        .accessors()
        .iter()
        .map(|a| LazyParser::new(format, a.member().type_info()))
        .collect();

    parse_fn(move |text, cx| {
        let p = cx.primitives();
        let config = cx.config();
        let text = text.trim();
        if p.is_null(text) {
            return Ok(None);
        }
        let Some(_depth) = DepthGuard::enter(config.max_depth) else {
            return Ok(None);
        };

        let mut instance = (info.default_fn())();
        let lenient = config.is_lenient() || info.is_lenient();
        let mut index = 0;
        p.eat_map_start(text, &mut index);

        loop {
            p.eat_whitespace(text, &mut index);
            let raw_key = p.eat_map_key(text, &mut index);
            if raw_key.is_empty() {
                break;
            }
            let key = p.unescape_string(raw_key);
            p.eat_map_key_separator(text, &mut index);
            let value = p.eat_value(text, &mut index);

            if key == config.type_attr {
                let name = p.unescape_string(value);
                // The declared type is read whatever the tag says.
                if name != info.type_path()
                    && resolve_type_tag(&name, type_info, config).is_none()
                {
                    log::debug!("`{}` of `{}` ignored", config.type_attr, info.type_path());
                }
            } else {
                let found = descriptor.find_index(&key, lenient, config.text_case);
                let replaced = info
                    .on_deserializing()
                    .and_then(|hook| hook(&mut *instance, &key, value));

                match found {
                    None => log::debug!("unknown member `{key}` of `{}` skipped", info.type_path()),
                    Some(position) => {
                        let accessor = &descriptor.accessors()[position];
                        let raw = replaced.as_deref().unwrap_or(value);
                        let result = parsers[position].get()(raw, cx).and_then(|parsed| {
                            let Some(parsed) = parsed else {
                                return Ok(());
                            };
                            if accessor.set(&mut *instance, parsed) {
                                Ok(())
                            } else {
                                Err(Error::TypeMismatch {
                                    expected: accessor.type_info().type_path(),
                                })
                            }
                        });

                        if let Err(e) = result {
                            if let Some(report) = &config.on_deserialization_error {
                                report(&*instance, accessor.name(), raw, &e);
                            }
                            if config.throw_on_error {
                                return Err(Error::Member {
                                    type_path: info.type_path(),
                                    member: accessor.name().into(),
                                    source: Box::new(e),
                                });
                            }
                            log::warn!(
                                "member `{}` of `{}` left at its default: {e}",
                                accessor.name(),
                                info.type_path()
                            );
                        }
                    }
                }
            }

            if !p.eat_item_separator_or_map_end(text, &mut index) {
                break;
            }
        }

        if let Some(hook) = info.on_deserialized() {
            hook(&mut *instance);
        }
        Ok(Some(instance))
    })
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::any::Any;
    use std::sync::Mutex;

    use crate::config::{Config, TextCase};
    use crate::derive::Typed;
    use crate::dispatch::{Context, resolve_parser, resolve_writer};
    use crate::format::Format;
    use crate::info::Typed as _;
    use crate::{Error, Result};

    #[derive(Typed, Default, Debug, Clone, Copy, PartialEq)]
    enum Mood {
        #[default]
        Calm,
        Busy,
    }

    #[derive(Typed, Default, Debug, PartialEq)]
    struct Profile {
        user_name: String,
        age: u32,
        nick: Option<String>,
        mood: Mood,
    }

    #[derive(Typed, Default, Debug, PartialEq)]
    #[jsv(on_deserializing = "Audited::audit", on_deserialized = "Audited::finish")]
    struct Audited {
        value: i32,
        seen: Vec<String>,
        done: bool,
    }

    impl Audited {
        fn audit(&mut self, name: &str, text: &str) -> Option<String> {
            self.seen.push(name.to_string());
            (text == "ten").then(|| "10".to_string())
        }

        fn finish(&mut self) {
            self.done = true;
        }
    }

    fn write<T: crate::info::Typed>(format: Format, value: &T, config: &Config) -> String {
        let mut out = String::new();
        let cx = Context::new(format, config);
        resolve_writer(format, T::type_info())(&mut out, value, &cx);
        out
    }

    fn read<T: crate::info::Typed>(format: Format, text: &str, config: &Config) -> Result<Option<T>> {
        let cx = Context::new(format, config);
        let parsed = resolve_parser(format, T::type_info())(text, &cx)?;
        Ok(parsed.and_then(|v| v.downcast::<T>().ok()).map(|v| *v))
    }

    #[test]
    fn members_in_declaration_order() {
        let config = Config::default();
        let profile = Profile {
            user_name: "ann".into(),
            age: 3,
            nick: None,
            mood: Mood::Calm,
        };
        assert_eq!(
            write(Format::Json, &profile, &config),
            r#"{"user_name":"ann","age":3}"#
        );
        assert_eq!(write(Format::Jsv, &profile, &config), "{user_name:ann,age:3}");

        let config = Config {
            include_null_values: true,
            include_default_enums: true,
            text_case: TextCase::CamelCase,
            ..Config::default()
        };
        assert_eq!(
            write(Format::Json, &profile, &config),
            r#"{"userName":"ann","age":3,"nick":null,"mood":"Calm"}"#
        );
    }

    #[test]
    fn type_info_on_request() {
        let config = Config {
            include_type_info: true,
            ..Config::default()
        };
        let text = write(Format::Jsv, &Profile::default(), &config);
        assert!(text.starts_with(r#"{__type:"vc_jsv::dispatch::object::tests::Profile","#));

        let back: Profile = read(Format::Jsv, &text, &Config::default()).unwrap().unwrap();
        assert_eq!(back, Profile::default());
    }

    #[test]
    fn custom_type_attr() {
        let config = Config {
            include_type_info: true,
            type_attr: "$type".into(),
            ..Config::default()
        };
        let text = write(Format::Json, &Profile::default(), &config);
        assert!(text.starts_with(r#"{"$type":"vc_jsv::dispatch::object::tests::Profile","#));

        let profile = r#"{"$type":"vc_jsv::dispatch::object::tests::Profile","age":4}"#;
        let back: Profile = read(Format::Json, profile, &config).unwrap().unwrap();
        assert_eq!(back.age, 4);

        let foreign = r#"{"$type":"other::Thing","age":5}"#;
        let back: Profile = read(Format::Json, foreign, &config).unwrap().unwrap();
        assert_eq!(back.age, 5);

        // Under the default name the renamed tag is an unknown member.
        let back: Profile = read(Format::Json, profile, &Config::default()).unwrap().unwrap();
        assert_eq!(back.age, 4);
    }

    #[test]
    fn excluded_members_are_not_written() {
        let profile = Profile {
            user_name: "ann".into(),
            age: 3,
            nick: Some("a".into()),
            mood: Mood::Busy,
        };
        let config = Config {
            exclude_types: vec!["vc_jsv::dispatch::object::tests::Mood".into()],
            exclude_property_references: vec!["Profile.age".into()],
            ..Config::default()
        };
        assert_eq!(
            write(Format::Jsv, &profile, &config),
            "{user_name:ann,nick:a}"
        );

        let by_path = Config {
            exclude_property_references: vec![
                "vc_jsv::dispatch::object::tests::Profile.nick".into(),
                "Other.user_name".into(),
            ],
            ..Config::default()
        };
        assert_eq!(
            write(Format::Jsv, &profile, &by_path),
            "{user_name:ann,age:3,mood:Busy}"
        );
    }

    #[test]
    fn unknown_members_are_skipped() {
        let config = Config::default();
        let back: Profile = read(
            Format::Json,
            r#"{"extra":[1,{"a":2}],"age":7,"mood":"busy"}"#,
            &config,
        )
        .unwrap()
        .unwrap();
        assert_eq!(back.age, 7);
        assert_eq!(back.mood, Mood::Busy);
    }

    #[test]
    fn missing_braces_are_tolerated() {
        let back: Profile = read(Format::Jsv, "age:5,user_name:bo", &Config::default())
            .unwrap()
            .unwrap();
        assert_eq!(back.age, 5);
        assert_eq!(back.user_name, "bo");
    }

    #[test]
    fn member_errors() {
        let reported = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reported);
        let config = Config {
            on_deserialization_error: Some(Arc::new(
                move |_: &dyn Any, name: &str, raw: &str, _: &Error| {
                    sink.lock().unwrap().push(alloc::format!("{name}={raw}"));
                },
            )),
            ..Config::default()
        };
        let back: Profile = read(Format::Jsv, "{age:old,user_name:x}", &config)
            .unwrap()
            .unwrap();
        assert_eq!(back.age, 0);
        assert_eq!(back.user_name, "x");
        assert_eq!(*reported.lock().unwrap(), ["age=old"]);

        let strict = Config {
            throw_on_error: true,
            ..Config::default()
        };
        let err = read::<Profile>(Format::Jsv, "{age:old}", &strict).unwrap_err();
        assert!(matches!(err, Error::Member { ref member, .. } if member == "age"));
    }

    #[test]
    fn hooks_run() {
        let back: Audited = read(Format::Jsv, "{value:ten,other:1}", &Config::default())
            .unwrap()
            .unwrap();
        assert_eq!(back.value, 10);
        assert_eq!(back.seen, ["value", "other"]);
        assert!(back.done);
    }
}
