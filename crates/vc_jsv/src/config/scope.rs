use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::marker::PhantomData;

use crate::config::{Config, DateHandler, PropertyConvention, TextCase, TimeSpanHandler};
use crate::{Error, Result};

// -----------------------------------------------------------------------------
// ConfigScope

std::thread_local! {
    static SCOPES: RefCell<Vec<Arc<Config>>> = const { RefCell::new(Vec::new()) };
}

pub(super) fn innermost() -> Option<Arc<Config>> {
    SCOPES.with_borrow(|scopes| scopes.last().cloned())
}

/// Keeps a config in effect on the current thread until dropped.
///
/// Scopes nest; dropping one restores the config that was in effect when it
/// was created. Created by [`Config::scope`], [`Config::scope_with`] and
/// [`Config::scope_from_str`].
#[must_use = "the config is only in effect while the scope is alive"]
pub struct ConfigScope {
    depth: usize,
    // Scopes belong to the thread that created them.
    _marker: PhantomData<*const ()>,
}

impl ConfigScope {
    pub(super) fn push(config: Arc<Config>) -> Self {
        let depth = SCOPES.with_borrow_mut(|scopes| {
            scopes.push(config);
            scopes.len()
        });
        Self {
            depth,
            _marker: PhantomData,
        }
    }
}

impl Drop for ConfigScope {
    fn drop(&mut self) {
        SCOPES.with_borrow_mut(|scopes| scopes.truncate(self.depth - 1));
    }
}

// -----------------------------------------------------------------------------
// Option strings

/// Applies a comma separated list of `key` or `key:value` items.
pub(super) fn apply(config: &mut Config, text: &str) -> Result<()> {
    for item in text.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }

        let (key, raw) = match item.split_once(':') {
            Some((key, raw)) => (normalize(key), Some(raw.trim())),
            None => (normalize(item), None),
        };
        let value = raw.map(normalize);
        let value = value.as_deref();

        match key.as_str() {
            "dh" | "datehandler" => config.date_handler = date_handler(value)?,
            "tsh" | "timespanhandler" => config.time_span_handler = time_span_handler(value)?,
            "pc" | "propertyconvention" => config.property_convention = convention(value)?,
            "tc" | "textcase" => config.text_case = text_case(value)?,
            "eccn" | "emitcamelcasenames" => {
                config.text_case = cased(flag(&key, value)?, TextCase::CamelCase);
            }
            "elun" | "emitlowercaseunderscorenames" => {
                config.text_case = cased(flag(&key, value)?, TextCase::SnakeCase);
            }
            "dtf" | "datetimeformat" => {
                config.date_time_format = raw.filter(|v| !v.is_empty()).map(String::from);
            }
            "ta" | "typeattr" => {
                config.type_attr = raw
                    .filter(|v| !v.is_empty())
                    .map(String::from)
                    .ok_or_else(|| Error::Config(format!("`{key}` expects a name")))?;
            }
            "md" | "maxdepth" => {
                config.max_depth = value
                    .and_then(|v| v.parse().ok())
                    .ok_or_else(|| Error::Config(format!("`{key}` expects a number")))?;
            }
            _ => match bool_option(config, &key) {
                Some(slot) => *slot = flag(&key, value)?,
                None => return Err(Error::Config(format!("unknown option `{key}`"))),
            },
        }
    }
    Ok(())
}

fn normalize(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn bool_option<'a>(config: &'a mut Config, key: &str) -> Option<&'a mut bool> {
    Some(match key {
        "cotisd" | "convertobjecttypesintostringdictionary" => {
            &mut config.convert_object_types_into_string_dictionary
        }
        "ttpptv" | "trytoparseprimitivetypevalues" => {
            &mut config.try_to_parse_primitive_type_values
        }
        "ttpnt" | "trytoparsenumerictype" => &mut config.try_to_parse_numeric_type,
        "edv" | "excludedefaultvalues" => &mut config.exclude_default_values,
        "inv" | "includenullvalues" => &mut config.include_null_values,
        "invid" | "includenullvaluesindictionaries" => {
            &mut config.include_null_values_in_dictionaries
        }
        "ide" | "includedefaultenums" => &mut config.include_default_enums,
        "eti" | "excludetypeinfo" => &mut config.exclude_type_info,
        "iti" | "includetypeinfo" => &mut config.include_type_info,
        "tode" | "toe" | "throwondeserializationerror" | "throwonerror" => {
            &mut config.throw_on_error
        }
        "teai" | "treatenumasinteger" => &mut config.treat_enum_as_integer,
        "sdtc" | "skipdatetimeconversion" => &mut config.skip_date_time_conversion,
        "auu" | "alwaysuseutc" => &mut config.always_use_utc,
        "au" | "assumeutc" => &mut config.assume_utc,
        "auo" | "appendutcoffset" => &mut config.append_utc_offset,
        "eu" | "escapeunicode" => &mut config.escape_unicode,
        "ehc" | "escapehtmlchars" => &mut config.escape_html_chars,
        "ari" | "allowruntimeinterfaces" => &mut config.allow_runtime_interfaces,
        _ => return None,
    })
}

fn flag(key: &str, value: Option<&str>) -> Result<bool> {
    match value {
        None | Some("true" | "1") => Ok(true),
        Some("false" | "0") => Ok(false),
        Some(other) => Err(Error::Config(format!("`{key}` expects a bool, found `{other}`"))),
    }
}

fn cased(enabled: bool, case: TextCase) -> TextCase {
    if enabled { case } else { TextCase::Default }
}

fn date_handler(value: Option<&str>) -> Result<DateHandler> {
    Ok(match value.unwrap_or_default() {
        "to" | "timestampoffset" => DateHandler::TimestampOffset,
        "dcjsc" | "dcjscompatible" => DateHandler::DcjsCompatible,
        "iso8601" => DateHandler::Iso8601,
        "iso8601do" | "iso8601dateonly" => DateHandler::Iso8601DateOnly,
        "iso8601dt" | "iso8601datetime" => DateHandler::Iso8601DateTime,
        "rfc1123" => DateHandler::Rfc1123,
        "ut" | "unixtime" => DateHandler::UnixTime,
        "utm" | "unixtimems" => DateHandler::UnixTimeMs,
        other => return Err(unknown_value("dh", other)),
    })
}

fn time_span_handler(value: Option<&str>) -> Result<TimeSpanHandler> {
    Ok(match value.unwrap_or_default() {
        "df" | "durationformat" => TimeSpanHandler::DurationFormat,
        "sf" | "standardformat" => TimeSpanHandler::StandardFormat,
        other => return Err(unknown_value("tsh", other)),
    })
}

fn convention(value: Option<&str>) -> Result<PropertyConvention> {
    Ok(match value.unwrap_or_default() {
        "s" | "strict" => PropertyConvention::Strict,
        "l" | "lenient" => PropertyConvention::Lenient,
        other => return Err(unknown_value("pc", other)),
    })
}

fn text_case(value: Option<&str>) -> Result<TextCase> {
    Ok(match value.unwrap_or_default() {
        "d" | "default" => TextCase::Default,
        "pc" | "pascalcase" => TextCase::PascalCase,
        "cc" | "camelcase" => TextCase::CamelCase,
        "sc" | "snakecase" => TextCase::SnakeCase,
        other => return Err(unknown_value("tc", other)),
    })
}

fn unknown_value(key: &str, value: &str) -> Error {
    Error::Config(format!("unknown value `{value}` for `{key}`"))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::apply;
    use crate::config::{Config, DateHandler, PropertyConvention, TextCase, TimeSpanHandler};

    #[test]
    fn short_and_long_aliases() {
        let mut config = Config::default();
        apply(&mut config, "dh:iso8601, tsh:sf ,pc:l,Include_Null_Values,teai").unwrap();
        assert_eq!(config.date_handler, DateHandler::Iso8601);
        assert_eq!(config.time_span_handler, TimeSpanHandler::StandardFormat);
        assert_eq!(config.property_convention, PropertyConvention::Lenient);
        assert!(config.include_null_values);
        assert!(config.treat_enum_as_integer);
    }

    #[test]
    fn explicit_values_disable_flags() {
        let mut config = Config::default();
        apply(&mut config, "ide:false,eu:0,md:3,elun").unwrap();
        assert!(!config.include_default_enums);
        assert!(!config.escape_unicode);
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.text_case, TextCase::SnakeCase);
    }

    #[test]
    fn text_values_keep_their_case() {
        let mut config = Config::default();
        apply(&mut config, "dtf:%d/%m/%Y %H:%M, ta:$Type, ehc").unwrap();
        assert_eq!(config.date_time_format.as_deref(), Some("%d/%m/%Y %H:%M"));
        assert_eq!(config.type_attr, "$Type");
        assert!(config.escape_html_chars);

        apply(&mut config, "dtf:").unwrap();
        assert_eq!(config.date_time_format, None);
        assert!(apply(&mut config, "ta").is_err());
    }

    #[test]
    fn unknown_keys_are_errors() {
        let mut config = Config::default();
        assert!(apply(&mut config, "nope").is_err());
        assert!(apply(&mut config, "dh:never").is_err());
        assert!(apply(&mut config, "inv:maybe").is_err());
    }

    #[test]
    fn scope_from_str_restores_on_drop() {
        {
            let _scope = Config::scope_from_str("dh:ut").unwrap();
            assert_eq!(Config::current().date_handler, DateHandler::UnixTime);
        }
        assert_eq!(Config::current().date_handler, Config::global().date_handler);
    }
}
