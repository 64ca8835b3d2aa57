use crate::config::Config;
use crate::info::{TypeInfo, TypeKind};

/// The default name of the member carrying the concrete type of a value,
/// see `Config::type_attr`.
pub const TYPE_TAG: &str = "__type";

/// Returns `true` if `info` may be instantiated from a type tag read into a
/// slot declared as `declared`.
///
/// A type passes when any of these holds:
///
/// - it is a scalar;
/// - its type path is in `allow_runtime_types`;
/// - its module is, or is nested in, one of `allow_runtime_namespaces`;
/// - it carries one of `allow_runtime_markers`;
/// - the `allow_runtime_type` predicate accepts it;
/// - `declared` is abstract, `allow_runtime_interfaces` is on, and the type
///   is a registered implementor of `declared`.
pub fn is_runtime_type_allowed(info: &TypeInfo, declared: &TypeInfo, config: &Config) -> bool {
    if info.kind() == TypeKind::Primitive {
        return true;
    }

    let path = info.type_path();
    if config.allow_runtime_types.iter().any(|t| t == path) {
        return true;
    }

    if let Some(module) = info.module_path()
        && config.allow_runtime_namespaces.iter().any(|ns| {
            module
                .strip_prefix(ns.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
        })
    {
        return true;
    }

    if info
        .markers()
        .iter()
        .any(|m| config.allow_runtime_markers.iter().any(|a| a == m))
    {
        return true;
    }

    if let Some(allow) = &config.allow_runtime_type
        && allow(info)
    {
        return true;
    }

    config.allow_runtime_interfaces
        && declared.kind() == TypeKind::Abstract
        && super::global()
            .read()
            .implementor(declared.type_id(), info.type_id())
            .is_some()
}

/// Resolves the type named by a `__type` tag for a slot declared as
/// `declared`.
///
/// The name goes to the `type_finder` of the config first, then to the
/// global registry by full path and by unambiguous short name. The type must
/// be concrete, fit the slot and pass [`is_runtime_type_allowed`]. The
/// declared type itself is always accepted.
///
/// Returns `None`, after a warning, when any check fails. Callers then read
/// the declared type, or null for abstract and loosely-typed slots.
pub fn resolve_type_tag(
    name: &str,
    declared: &'static TypeInfo,
    config: &Config,
) -> Option<&'static TypeInfo> {
    let found = config
        .type_finder
        .as_ref()
        .and_then(|finder| finder(name))
        .or_else(|| super::global().read().find(name));
    let attr = &config.type_attr;

    let Some(info) = found else {
        log::warn!("unknown type `{name}` in `{attr}` ignored");
        return None;
    };

    if !info.is_concrete() {
        log::warn!("type `{name}` in `{attr}` is not concrete, ignored");
        return None;
    }

    if info.type_id() == declared.type_id() {
        return Some(info);
    }

    let fits = match declared.kind() {
        TypeKind::Abstract => super::global()
            .read()
            .implementor(declared.type_id(), info.type_id())
            .is_some(),
        TypeKind::Dynamic => true,
        _ => false,
    };
    if !fits {
        log::warn!(
            "type `{name}` in `{attr}` cannot be read as `{}`, ignored",
            declared.type_path()
        );
        return None;
    }

    if !is_runtime_type_allowed(info, declared, config) {
        log::warn!(
            "type `{name}` in `{attr}` is not an allowed runtime type, ignored"
        );
        return None;
    }

    Some(info)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::sync::Arc;
    use alloc::vec;

    use super::{is_runtime_type_allowed, resolve_type_tag};
    use crate::Reflect;
    use crate::config::Config;
    use crate::derive::Typed;
    use crate::info::{TypeInfo, TypePath, Typed as _};
    use crate::value::Value;

    #[derive(Typed, Default)]
    #[jsv(runtime_serializable)]
    struct TaggedItem {
        id: u32,
    }

    #[derive(Typed, Default)]
    struct UntaggedItem {
        id: u32,
    }

    trait Shape: Reflect {}
    impl Shape for UntaggedItem {}
    crate::impl_abstract!(dyn Shape);

    fn register() {
        let registry = crate::registry::global();
        let mut registry = registry.write();
        registry.register::<TaggedItem>();
        registry.register::<UntaggedItem>();
        registry.register_implementor::<Box<dyn Shape>, UntaggedItem>(|v| Box::new(v));
    }

    #[test]
    fn allow_list_sources() {
        register();
        let plain = UntaggedItem::type_info();
        let any = Value::type_info();
        let config = Config::default();

        assert!(is_runtime_type_allowed(TaggedItem::type_info(), any, &config));
        assert!(is_runtime_type_allowed(u8::type_info(), any, &config));
        assert!(!is_runtime_type_allowed(plain, any, &config));
        assert!(is_runtime_type_allowed(plain, <Box<dyn Shape>>::type_info(), &config));

        let listed = Config {
            allow_runtime_types: vec![UntaggedItem::type_path().into()],
            ..Config::default()
        };
        assert!(is_runtime_type_allowed(plain, any, &listed));

        let namespace = Config {
            allow_runtime_namespaces: vec!["vc_jsv::registry".into()],
            ..Config::default()
        };
        assert!(is_runtime_type_allowed(plain, any, &namespace));
        let partial = Config {
            allow_runtime_namespaces: vec!["vc_jsv::reg".into()],
            ..Config::default()
        };
        assert!(!is_runtime_type_allowed(plain, any, &partial));

        let predicate = Config {
            allow_runtime_type: Some(Arc::new(|info: &TypeInfo| info.type_name() == "UntaggedItem")),
            ..Config::default()
        };
        assert!(is_runtime_type_allowed(plain, any, &predicate));
    }

    #[test]
    fn tags_resolve_within_the_declared_slot() {
        register();
        let config = Config::default();
        let any = Value::type_info();

        let found = resolve_type_tag("TaggedItem", any, &config).unwrap();
        assert_eq!(found.type_id(), TaggedItem::type_info().type_id());
        assert!(resolve_type_tag("UntaggedItem", any, &config).is_none());
        assert!(resolve_type_tag("Evil.Type", any, &config).is_none());

        // A concrete slot only accepts its own type.
        assert!(resolve_type_tag("TaggedItem", UntaggedItem::type_info(), &config).is_none());
        assert!(resolve_type_tag("UntaggedItem", UntaggedItem::type_info(), &config).is_some());

        let shape = <Box<dyn Shape>>::type_info();
        assert!(resolve_type_tag(UntaggedItem::type_path(), shape, &config).is_some());
        assert!(resolve_type_tag("TaggedItem", shape, &config).is_none());
        assert!(resolve_type_tag(<Box<dyn Shape>>::type_path(), shape, &config).is_none());
    }

    #[test]
    fn type_finder_comes_first() {
        let config = Config {
            type_finder: Some(Arc::new(|name: &str| (name == "alias").then(TaggedItem::type_info))),
            ..Config::default()
        };
        let found = resolve_type_tag("alias", Value::type_info(), &config).unwrap();
        assert_eq!(found.type_name(), "TaggedItem");
    }
}
