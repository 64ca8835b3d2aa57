use alloc::string::String;
use core::fmt::Write;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::config::{Config, DateHandler, TimeSpanHandler};
use crate::format::{Escape, Format, FormatPrimitives, Jsv};
use crate::state;
use crate::time::{DateTime, DateTimeKind, NANOS_PER_TICK, offset_to_compact};
use crate::time::{to_standard_time_span, to_xsd_duration};

// -----------------------------------------------------------------------------
// Text forms

/// Relabels an unspecified value as UTC under `assume_utc`.
fn with_config_kind(value: &DateTime, config: &Config) -> DateTime {
    if config.assume_utc && value.kind() == DateTimeKind::Unspecified {
        value.with_kind(DateTimeKind::Utc)
    } else {
        *value
    }
}

#[inline]
fn ticks_of(naive: &NaiveDateTime) -> u32 {
    naive.nanosecond() / NANOS_PER_TICK
}

fn push_seconds(out: &mut String, naive: &NaiveDateTime) {
    let _ = write!(out, "{}", naive.format("%Y-%m-%dT%H:%M:%S"));
}

fn push_ticks(out: &mut String, naive: &NaiveDateTime) {
    let _ = write!(out, ".{:07}", ticks_of(naive));
}

/// `+hh:mm` or `-hh:mm`.
fn push_offset(out: &mut String, offset: FixedOffset) {
    let secs = offset.local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let mins = secs.unsigned_abs() / 60;
    let _ = write!(out, "{sign}{:02}:{:02}", mins / 60, mins % 60);
}

/// The shortest XSD form that reads back to the same value.
///
/// Midnight is written as `yyyy-MM-dd`, a value without sub-second part
/// has no fraction, and otherwise a 7-digit fraction is written. UTC values
/// end in `Z`, other kinds carry the local offset unless conversions are
/// skipped, in which case an unspecified value has no zone at all.
pub fn to_shortest_xsd(value: &DateTime, config: &Config) -> String {
    let value = with_config_kind(value, config);
    let mut out = String::with_capacity(33);
    let naive = value.naive();

    if naive.time() == NaiveTime::MIN && !config.skip_date_time_conversion {
        let _ = write!(out, "{}", naive.format("%Y-%m-%d"));
        return out;
    }

    let has_fraction = ticks_of(&naive) != 0;
    match value.kind() {
        DateTimeKind::Utc => {
            let utc = value.naive();
            push_seconds(&mut out, &utc);
            if has_fraction {
                push_ticks(&mut out, &utc);
            }
            out.push('Z');
        }
        DateTimeKind::Unspecified if config.skip_date_time_conversion => {
            push_seconds(&mut out, &naive);
            if has_fraction {
                push_ticks(&mut out, &naive);
            }
        }
        DateTimeKind::Local | DateTimeKind::Unspecified => {
            push_seconds(&mut out, &naive);
            if has_fraction {
                push_ticks(&mut out, &naive);
            }
            push_offset(&mut out, value.offset());
        }
    }
    out
}

/// ISO 8601 with a 7-digit fraction: `Z` for UTC, the local offset for
/// local values and no zone for unspecified ones.
pub fn to_iso8601_round_trip(value: &DateTime) -> String {
    let mut out = String::with_capacity(33);
    let naive = value.naive();
    push_seconds(&mut out, &naive);
    push_ticks(&mut out, &naive);
    match value.kind() {
        DateTimeKind::Utc => out.push('Z'),
        DateTimeKind::Local => push_offset(&mut out, value.offset()),
        DateTimeKind::Unspecified => {}
    }
    out
}

/// The JSON string form of a date under the active date handler.
///
/// The default handlers write `\/Date(ms±hhmm)\/`. A UTC value has no
/// offset unless `append_utc_offset` is set, and an unspecified value is
/// written with the `-0000` sentinel under `TimestampOffset`.
pub fn to_wcf_date(value: &DateTime, config: &Config) -> String {
    let value = with_config_kind(value, config);
    let handler = config.date_handler;
    let mut out = String::with_capacity(32);
    match handler {
        DateHandler::Iso8601 => return to_iso8601_round_trip(&value),
        DateHandler::Iso8601DateOnly => {
            let _ = write!(out, "{}", value.naive().format("%Y-%m-%d"));
            return out;
        }
        DateHandler::Iso8601DateTime => {
            let _ = write!(out, "{}", value.naive().format("%Y-%m-%d %H:%M:%S"));
            return out;
        }
        DateHandler::Rfc1123 => {
            let utc = value.to_utc().naive();
            let _ = write!(out, "{}", utc.format("%a, %d %b %Y %H:%M:%S GMT"));
            return out;
        }
        _ => {}
    }

    let _ = write!(out, "\\/Date({}", value.unix_millis());
    match value.kind() {
        DateTimeKind::Utc => {
            if handler == DateHandler::TimestampOffset && config.append_utc_offset {
                out.push_str("+0000");
            }
        }
        DateTimeKind::Unspecified if handler == DateHandler::TimestampOffset => {
            out.push_str("-0000");
        }
        DateTimeKind::Local | DateTimeKind::Unspecified => offset_to_compact(value.offset(), &mut out),
    }
    out.push_str(")\\/");
    out
}

// -----------------------------------------------------------------------------
// Tokens

/// Writes a temporal scalar: quoted in JSON, bare in JSV unless it is a map
/// key.
fn push_token(out: &mut String, text: &str, format: Format) {
    match format {
        Format::Json => {
            out.push('"');
            out.push_str(text);
            out.push('"');
        }
        Format::Jsv if state::is_writing_key() => Jsv.write_string(out, text, Escape::empty()),
        Format::Jsv => out.push_str(text),
    }
}

/// Writes a [`DateTime`] token.
///
/// JSON follows the date handler, `UnixTime` and `UnixTimeMs` writing bare
/// numbers. JSV always writes the shortest XSD form. A `date_time_format`
/// layout takes precedence over both.
pub fn write_date_time(out: &mut String, value: &DateTime, format: Format, config: &Config) {
    if let Some(layout) = &config.date_time_format
        && let Some(text) = format_custom(value, layout)
    {
        // Free-form text, quoted and escaped like any string.
        format.primitives().write_string(out, &text, Escape::empty());
        return;
    }
    match (format, config.date_handler) {
        (Format::Json, DateHandler::UnixTime) => {
            let _ = write!(out, "{}", value.unix_seconds());
        }
        (Format::Json, DateHandler::UnixTimeMs) => {
            let _ = write!(out, "{}", value.unix_millis());
        }
        (Format::Json, _) => push_token(out, &to_wcf_date(value, config), format),
        (Format::Jsv, _) => push_token(out, &to_shortest_xsd(value, config), format),
    }
}

/// Formats `value` with a `chrono` layout, `None` if the layout is invalid.
fn format_custom(value: &DateTime, layout: &str) -> Option<String> {
    let zoned = value.naive().and_local_timezone(value.offset()).single()?;
    let mut text = String::new();
    if write!(text, "{}", zoned.format(layout)).is_err() {
        log::warn!("invalid date layout `{layout}`, written in the handler form");
        return None;
    }
    Some(text)
}

/// Writes a date with an offset: WCF with its offset in JSON, round-trip
/// ISO 8601 in JSV and under the `Iso8601` handler.
pub fn write_date_offset(
    out: &mut String,
    value: &chrono::DateTime<FixedOffset>,
    format: Format,
    config: &Config,
) {
    let mut text = String::with_capacity(33);
    if format == Format::Jsv || config.date_handler == DateHandler::Iso8601 {
        let naive = value.naive_local();
        push_seconds(&mut text, &naive);
        push_ticks(&mut text, &naive);
        push_offset(&mut text, *value.offset());
    } else {
        let _ = write!(text, "\\/Date({}", value.timestamp_millis());
        if value.offset().local_minus_utc() != 0 {
            offset_to_compact(*value.offset(), &mut text);
        }
        text.push_str(")\\/");
    }
    push_token(out, &text, format);
}

/// Writes a calendar date as `yyyy-MM-dd`, or as a Unix time of its UTC
/// midnight under the numeric JSON handlers.
pub fn write_date_only(out: &mut String, value: &NaiveDate, format: Format, config: &Config) {
    let midnight = value.and_time(NaiveTime::MIN).and_utc();
    match (format, config.date_handler) {
        (Format::Json, DateHandler::UnixTime) => {
            let _ = write!(out, "{}", midnight.timestamp());
        }
        (Format::Json, DateHandler::UnixTimeMs) => {
            let _ = write!(out, "{}", midnight.timestamp_millis());
        }
        _ => {
            let mut text = String::with_capacity(10);
            let _ = write!(text, "{}", value.format("%Y-%m-%d"));
            push_token(out, &text, format);
        }
    }
}

/// Writes a span as an XSD duration or in the standard clock form.
pub fn write_time_span(out: &mut String, value: &TimeDelta, format: Format, config: &Config) {
    let text = match config.time_span_handler {
        TimeSpanHandler::DurationFormat => to_xsd_duration(value),
        TimeSpanHandler::StandardFormat => to_standard_time_span(value),
    };
    push_token(out, &text, format);
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use chrono::{FixedOffset, NaiveDate, TimeDelta, TimeZone};

    use super::{to_shortest_xsd, to_wcf_date, write_date_offset, write_date_time};
    use crate::config::{Config, DateHandler};
    use crate::format::Format;
    use crate::time::{DateTime, DateTimeKind, parse_date_offset, parse_date_time};

    fn utc(h: u32, nanos: u32) -> DateTime {
        let naive = NaiveDate::from_ymd_opt(2020, 3, 4)
            .unwrap()
            .and_hms_nano_opt(h, 6, 7, nanos)
            .unwrap();
        DateTime::utc(naive)
    }

    fn written(value: &DateTime, format: Format, config: &Config) -> String {
        let mut out = String::new();
        write_date_time(&mut out, value, format, config);
        out
    }

    #[test]
    fn shortest_xsd() {
        let config = Config::default();
        assert_eq!(to_shortest_xsd(&utc(5, 0), &config), "2020-03-04T05:06:07Z");
        assert_eq!(
            to_shortest_xsd(&utc(5, 123_456_700), &config),
            "2020-03-04T05:06:07.1234567Z"
        );
        let midnight = DateTime::from_ymd_hms(2020, 3, 4, 0, 0, 0, DateTimeKind::Utc).unwrap();
        assert_eq!(to_shortest_xsd(&midnight, &config), "2020-03-04");

        let skip = Config {
            skip_date_time_conversion: true,
            ..Config::default()
        };
        let unspecified = utc(5, 0).with_kind(DateTimeKind::Unspecified);
        assert_eq!(to_shortest_xsd(&unspecified, &skip), "2020-03-04T05:06:07");
    }

    #[test]
    fn handlers() {
        let value = utc(5, 0);
        let with = |date_handler| Config {
            date_handler,
            ..Config::default()
        };
        assert_eq!(
            to_wcf_date(&value, &Config::default()),
            "\\/Date(1583298367000)\\/"
        );
        assert_eq!(
            to_wcf_date(&value, &with(DateHandler::Iso8601)),
            "2020-03-04T05:06:07.0000000Z"
        );
        assert_eq!(
            to_wcf_date(&value, &with(DateHandler::Iso8601DateOnly)),
            "2020-03-04"
        );
        assert_eq!(
            to_wcf_date(&value, &with(DateHandler::Iso8601DateTime)),
            "2020-03-04 05:06:07"
        );
        assert_eq!(
            to_wcf_date(&value, &with(DateHandler::Rfc1123)),
            "Wed, 04 Mar 2020 05:06:07 GMT"
        );
        assert_eq!(
            written(&value, Format::Json, &with(DateHandler::UnixTime)),
            "1583298367"
        );
        assert_eq!(
            written(&value, Format::Json, &with(DateHandler::UnixTimeMs)),
            "1583298367000"
        );

        let append = Config {
            append_utc_offset: true,
            ..Config::default()
        };
        assert_eq!(to_wcf_date(&value, &append), "\\/Date(1583298367000+0000)\\/");
    }

    #[test]
    fn custom_layout() {
        let config = Config {
            date_time_format: Some("%d.%m.%Y %H:%M:%S %z".into()),
            always_use_utc: true,
            ..Config::default()
        };
        let value = utc(5, 0);
        assert_eq!(written(&value, Format::Json, &config), r#""04.03.2020 05:06:07 +0000""#);
        assert_eq!(written(&value, Format::Jsv, &config), "04.03.2020 05:06:07 +0000");
        assert_eq!(parse_date_time("04.03.2020 05:06:07 +0000", &config).unwrap(), value);
        // Other encodings are still read.
        assert_eq!(parse_date_time("2020-03-04T05:06:07Z", &config).unwrap(), value);

        let config = Config {
            date_time_format: Some("%d/%m/%Y".into()),
            always_use_utc: true,
            skip_date_time_conversion: true,
            ..Config::default()
        };
        assert_eq!(written(&value, Format::Jsv, &config), "04/03/2020");

        let broken = Config {
            date_time_format: Some("%Q".into()),
            ..Config::default()
        };
        assert_eq!(written(&value, Format::Jsv, &broken), "2020-03-04T05:06:07Z");
    }

    #[test]
    fn unspecified_uses_sentinel() {
        let value = utc(5, 0).with_kind(DateTimeKind::Unspecified);
        let text = to_wcf_date(&value, &Config::default());
        assert!(text.ends_with("-0000)\\/"), "{text}");
    }

    #[test]
    fn offsets() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let value = offset.with_ymd_and_hms(2020, 3, 4, 5, 6, 7).unwrap() + TimeDelta::milliseconds(5);
        let config = Config::default();

        let mut json = String::new();
        write_date_offset(&mut json, &value, Format::Json, &config);
        assert_eq!(json, "\"\\/Date(1583291167005+0200)\\/\"");

        let mut jsv = String::new();
        write_date_offset(&mut jsv, &value, Format::Jsv, &config);
        assert_eq!(jsv, "2020-03-04T05:06:07.0050000+02:00");
        assert_eq!(parse_date_offset(&jsv, &config).unwrap(), value);
    }
}
