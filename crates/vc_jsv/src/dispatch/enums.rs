use core::fmt::Write;

use super::{ParseFn, WriteFn, parse_fn, write_fn};
use crate::Error;
use crate::format::Escape;
use crate::info::EnumInfo;

/// Writes the variant name, or its integer value under
/// `treat_enum_as_integer`.
pub(super) fn writer(info: &'static EnumInfo) -> WriteFn {
    write_fn(move |out, value, cx| {
        let Some(variant) = info.variant_of(value) else {
            log::error!("writer of `{}` got another type", info.type_path());
            return;
        };
        if cx.config().treat_enum_as_integer {
            let _ = write!(out, "{}", variant.value());
        } else {
            cx.primitives().write_string(out, variant.name(), Escape::empty());
        }
    })
}

/// Reads a variant by integer value or by name, ignoring case. Lenient
/// property matching also ignores `-` and `_` in names.
pub(super) fn parser(info: &'static EnumInfo) -> ParseFn {
    parse_fn(move |token, cx| {
        let p = cx.primitives();
        let token = token.trim();
        if p.is_null(token) {
            return Ok(None);
        }
        let text = p.unescape_string(token);
        let text = text.trim();
        let index = match text.parse::<i64>() {
            Ok(value) => info.find_by_value(value),
            Err(_) => info.find_by_name(text, cx.config().is_lenient()),
        };
        match index.and_then(|index| info.from_index(index)) {
            Some(value) => Ok(Some(value)),
            None => Err(Error::invalid(info.type_path(), text)),
        }
    })
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::config::{Config, PropertyConvention};
    use crate::derive::Typed;
    use crate::dispatch::{Context, resolve_parser, resolve_writer};
    use crate::format::Format;
    use crate::info::Typed as _;

    #[derive(Typed, Default, Debug, Clone, Copy, PartialEq)]
    enum Level {
        #[default]
        Low,
        #[jsv(rename = "MEDIUM")]
        Medium,
        VeryHigh = 10,
    }

    fn parse(text: &str, config: &Config) -> crate::Result<Option<Level>> {
        let cx = Context::new(Format::Jsv, config);
        let parsed = resolve_parser(Format::Jsv, Level::type_info())(text, &cx)?;
        Ok(parsed.and_then(|v| v.downcast_ref::<Level>().copied()))
    }

    #[test]
    fn names_and_values() {
        let mut config = Config::default();
        let mut out = String::new();
        let cx = Context::new(Format::Json, &config);
        resolve_writer(Format::Json, Level::type_info())(&mut out, &Level::Medium, &cx);
        assert_eq!(out, r#""MEDIUM""#);

        config.treat_enum_as_integer = true;
        let cx = Context::new(Format::Json, &config);
        out.clear();
        resolve_writer(Format::Json, Level::type_info())(&mut out, &Level::VeryHigh, &cx);
        assert_eq!(out, "10");
    }

    #[test]
    fn parse_by_name_or_value() {
        let mut config = Config::default();
        assert_eq!(parse("medium", &config).unwrap(), Some(Level::Medium));
        assert_eq!(parse("10", &config).unwrap(), Some(Level::VeryHigh));
        assert_eq!(parse("", &config).unwrap(), None);
        assert!(parse("very_high", &config).is_err());

        config.property_convention = PropertyConvention::Lenient;
        assert_eq!(parse("very_high", &config).unwrap(), Some(Level::VeryHigh));
    }
}
