use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};

use crate::config::{Config, DateHandler};
use crate::time::{DateTime, DateTimeKind, delta_of, local_offset_of_utc, offset_from_text};
use crate::{Error, Result};

const WCF_PREFIX: &str = "/Date(";
const ESCAPED_WCF_PREFIX: &str = "\\/Date(";
const UNSPECIFIED_OFFSET: &str = "-0000";

/// Length of `dd/MM/yyyy HH:mm:ss`.
const DEFAULT_LEN: usize = 19;
/// Length of `dd/MM/yyyy HH:mm:ss.fff`.
const DEFAULT_FRACTION_LEN: usize = 23;
/// Length of `yyyy-MM-ddTHH:mm:ssZ`.
const XSD_SECONDS_LEN: usize = 20;
/// Length of `yyyy-MM-ddTHH:mm:ss.fffZ`.
const XSD_3F_LEN: usize = 24;
/// Length of `yyyy-MM-ddTHH:mm:ss.fffffffZ`.
const XSD_LEN: usize = 28;
/// Index of the `T` in an XSD date.
const XSD_TIME_SEPARATOR: usize = 10;

// -----------------------------------------------------------------------------
// Conversion policy

/// Applies the conversion flags of `config` to a parsed value.
///
/// `parsed_as_utc` marks values read from an explicit UTC form, which are
/// converted to local time unless UTC is forced.
fn prepare(value: DateTime, parsed_as_utc: bool, config: &Config) -> DateTime {
    if config.skip_date_time_conversion {
        return value;
    }
    if config.always_use_utc {
        return value.to_utc();
    }
    if parsed_as_utc {
        value.to_local()
    } else {
        value
    }
}

fn invalid(text: &str, reason: &str) -> Error {
    Error::InvalidDate {
        text: text.into(),
        reason: reason.into(),
    }
}

// -----------------------------------------------------------------------------
// DateTime

/// Reads a date in any supported encoding.
///
/// The encoding is detected in this order:
///
/// 1. the custom `date_time_format` layout, when set;
/// 2. WCF `/Date(ms±hhmm)/`, with or without the escaped slash;
/// 3. `dd/MM/yyyy HH:mm:ss` by length, optionally with a `.fff` fraction;
/// 4. a bare number under the `UnixTime` and `UnixTimeMs` handlers;
/// 5. XSD `yyyy-MM-ddTHH:mm:ssZ`, with up to seven fraction digits;
/// 6. condensed `yyyyMMdd` and short `yyyy-MM-dd`;
/// 7. ISO 8601 with an offset, RFC 1123 and other common layouts;
/// 8. a field by field reader for anything left.
///
/// A token no rule accepts goes to the `on_date_parse_error` handler of
/// the config, or fails with [`Error::InvalidDate`].
pub fn parse_date_time(text: &str, config: &Config) -> Result<DateTime> {
    match detect(text, config) {
        Ok(value) => Ok(value),
        Err(err) => match &config.on_date_parse_error {
            Some(handler) => handler(text, err),
            None => Err(err),
        },
    }
}

fn detect(text: &str, config: &Config) -> Result<DateTime> {
    if text.is_empty() {
        return Ok(DateTime::default());
    }

    if let Some(layout) = &config.date_time_format
        && let Some(value) = parse_custom(text, layout, config)
    {
        return Ok(value);
    }

    if text.starts_with(ESCAPED_WCF_PREFIX) || text.starts_with(WCF_PREFIX) {
        return Ok(prepare(parse_wcf(text, config)?, false, config));
    }

    if text.len() == DEFAULT_LEN {
        let (naive, _) = parse_general(text).ok_or_else(|| invalid(text, "unknown layout"))?;
        let kind = if config.assume_utc {
            DateTimeKind::Utc
        } else {
            DateTimeKind::Unspecified
        };
        return Ok(prepare(DateTime::new(naive, kind), false, config));
    }

    let has_utc_suffix = text.ends_with('Z');
    if !has_utc_suffix && text.len() == DEFAULT_FRACTION_LEN {
        let (naive, _) = parse_general(text).ok_or_else(|| invalid(text, "unknown layout"))?;
        let value = if config.assume_utc {
            DateTime::utc(naive).to_local()
        } else {
            DateTime::unspecified(naive)
        };
        return Ok(prepare(value, false, config));
    }

    let mut kind = if has_utc_suffix {
        DateTimeKind::Utc
    } else {
        DateTimeKind::Unspecified
    };
    let mut text = Cow::Borrowed(text);
    match config.date_handler {
        DateHandler::UnixTime => {
            if let Ok(secs) = text.parse::<i32>() {
                return DateTime::from_unix_seconds(i64::from(secs))
                    .ok_or_else(|| invalid(&text, "out of range"));
            }
        }
        DateHandler::UnixTimeMs => {
            if let Ok(ms) = text.parse::<i64>() {
                return DateTime::from_unix_millis(ms).ok_or_else(|| invalid(&text, "out of range"));
            }
        }
        DateHandler::Iso8601 | DateHandler::Iso8601DateOnly | DateHandler::Iso8601DateTime
            if config.skip_date_time_conversion =>
        {
            let (trimmed, found) = remove_utc_offset(&text);
            let trimmed = String::from(trimmed);
            kind = found;
            text = Cow::Owned(trimmed);
        }
        _ => {}
    }

    let text = repair_time_separator(&text);
    let text = text.as_ref();

    if text.len() == XSD_SECONDS_LEN {
        let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%SZ")
            .map_err(|e| invalid(text, &format!("{e}")))?;
        return Ok(prepare(DateTime::utc(naive), true, config));
    }

    if (XSD_3F_LEN..=XSD_LEN).contains(&text.len()) && has_utc_suffix {
        let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.fZ")
            .map_err(|e| invalid(text, &format!("{e}")))?;
        return Ok(prepare(DateTime::utc(naive), true, config));
    }

    if text.len() == 8 && !text.contains(['-', '/']) {
        let date = NaiveDate::parse_from_str(text, "%Y%m%d")
            .map_err(|e| invalid(text, &format!("{e}")))?;
        return Ok(DateTime::unspecified(date.and_time(NaiveTime::MIN)));
    }

    if text.len() == 10
        && let Some(value) = parse_manual(text, config)
    {
        return Ok(value);
    }

    if let Some(parsed) = parse_general(text) {
        return Ok(resolve_general(parsed, kind, config));
    }

    parse_manual(text, config).ok_or_else(|| invalid(text, "no known date encoding"))
}

/// Reads `text` with a `chrono` layout, with or without an offset or a
/// time of day.
fn parse_custom(text: &str, layout: &str, config: &Config) -> Option<DateTime> {
    let parsed = match chrono::DateTime::parse_from_str(text, layout) {
        Ok(value) => (value.naive_local(), Some(*value.offset())),
        Err(_) => match NaiveDateTime::parse_from_str(text, layout) {
            Ok(naive) => (naive, None),
            Err(_) => (NaiveDate::parse_from_str(text, layout).ok()?.and_time(NaiveTime::MIN), None),
        },
    };
    Some(resolve_general(parsed, DateTimeKind::Unspecified, config))
}

/// Turns a generally parsed value into a [`DateTime`] the way the config
/// asks, `kind` being what the token said about its zone.
fn resolve_general(
    (naive, offset): (NaiveDateTime, Option<FixedOffset>),
    kind: DateTimeKind,
    config: &Config,
) -> DateTime {
    if config.skip_date_time_conversion {
        let to_utc = config.always_use_utc;
        return match (offset, kind) {
            (Some(offset), _) => {
                let utc = DateTime::utc(naive - delta_of(offset));
                if to_utc { utc } else { utc.to_local() }
            }
            (None, DateTimeKind::Unspecified) => {
                let value = DateTime::unspecified(naive);
                if to_utc { value.to_utc() } else { value }
            }
            (None, DateTimeKind::Local) => {
                let value = DateTime::local(naive);
                if to_utc { value.to_utc() } else { value }
            }
            (None, DateTimeKind::Utc) => {
                let value = DateTime::utc(naive);
                if to_utc { value } else { value.to_local() }
            }
        };
    }

    let value = match offset {
        Some(offset) => DateTime::utc(naive - delta_of(offset)).to_local(),
        None if config.assume_utc => DateTime::utc(naive).to_local(),
        None => DateTime::local(naive),
    };
    prepare(value, false, config)
}

/// Cuts a trailing `±hh:mm` offset, returning the zone it implied.
fn remove_utc_offset(text: &str) -> (&str, DateTimeKind) {
    let bytes = text.as_bytes();
    for start in 1..bytes.len() {
        if !matches!(bytes[start], b'+' | b'-') || bytes.len() < start + 6 {
            continue;
        }
        let hh = &bytes[start + 1..start + 3];
        let mm = &bytes[start + 4..start + 6];
        let valid_hour = matches!(hh, [b'0' | b'1', b'0'..=b'9'] | [b'2', b'0'..=b'3']);
        let valid_minute = matches!(mm, [b'0'..=b'5', b'0'..=b'9']);
        if valid_hour && bytes[start + 3] == b':' && valid_minute {
            return (&text[..start], DateTimeKind::Local);
        }
    }
    let kind = if text.contains('Z') {
        DateTimeKind::Utc
    } else {
        DateTimeKind::Unspecified
    };
    (text, kind)
}

/// Replaces a space at the XSD `T` position of a UTC token with `T`.
fn repair_time_separator(text: &str) -> Cow<'_, str> {
    if text.len() > XSD_TIME_SEPARATOR
        && text.as_bytes()[XSD_TIME_SEPARATOR] == b' '
        && text.ends_with('Z')
    {
        let mut repaired = String::with_capacity(text.len());
        repaired.push_str(&text[..XSD_TIME_SEPARATOR]);
        repaired.push('T');
        repaired.push_str(&text[XSD_TIME_SEPARATOR + 1..]);
        return Cow::Owned(repaired);
    }
    Cow::Borrowed(text)
}

// -----------------------------------------------------------------------------
// WCF

/// The timestamp and raw offset of a `/Date(ms±hhmm)/` token.
fn split_wcf(text: &str) -> Result<(i64, &str)> {
    let inner = text.strip_prefix('\\').unwrap_or(text);
    let inner = inner
        .strip_prefix(WCF_PREFIX)
        .ok_or_else(|| invalid(text, "missing `/Date(`"))?;
    let inner = match inner.find(')') {
        Some(end) => &inner[..end],
        None => inner,
    };
    let zone_at = inner.rfind(['+', '-']).filter(|at| *at > 0);
    let (millis, zone) = match zone_at {
        Some(at) => inner.split_at(at),
        None => (inner, ""),
    };
    let millis = millis
        .parse::<i64>()
        .map_err(|e| invalid(text, &format!("{e}")))?;
    Ok((millis, zone))
}

fn parse_wcf(text: &str, config: &Config) -> Result<DateTime> {
    let (millis, zone) = split_wcf(text)?;
    let utc = DateTime::from_unix_millis(millis).ok_or_else(|| invalid(text, "out of range"))?;
    if zone.is_empty() {
        return Ok(utc);
    }
    if config.date_handler == DateHandler::DcjsCompatible || zone == UNSPECIFIED_OFFSET {
        return Ok(utc.to_local());
    }
    let offset = offset_from_text(zone).ok_or_else(|| invalid(text, "invalid offset"))?;
    let local = utc
        .naive()
        .checked_add_signed(delta_of(offset))
        .ok_or_else(|| invalid(text, "out of range"))?;
    Ok(DateTime::local(local))
}

// -----------------------------------------------------------------------------
// Manual reader

/// Reads a date field by field: `yyyy-MM-dd`, `dd/MM/yyyy`, optionally
/// followed by `T` or a space, `HH:mm:ss[.fffffff]` and a `±hh:mm` offset.
///
/// The offset is added to the wall-clock value rather than converted
/// through a zone. Returns `None` when a field is missing or out of range.
pub fn parse_manual(text: &str, config: &Config) -> Option<DateTime> {
    let kind = if config.assume_utc || config.always_use_utc {
        DateTimeKind::Utc
    } else {
        DateTimeKind::Local
    };
    let value = parse_manual_as(text, kind, config)?;
    Some(match kind {
        DateTimeKind::Local => prepare(value, false, config),
        _ => value,
    })
}

fn parse_manual_as(text: &str, mut kind: DateTimeKind, config: &Config) -> Option<DateTime> {
    if text.len() < 10 {
        return None;
    }
    let text = match text.strip_suffix('Z') {
        Some(text) => {
            if config.skip_date_time_conversion {
                kind = DateTimeKind::Utc;
            }
            text
        }
        None => text,
    };

    let (date_part, time_part) = match text.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => match text.split_once(' ') {
            Some((date, time)) => (date, Some(time)),
            None => (text, None),
        },
    };
    if time_part.is_some_and(|time| time.contains('T')) {
        return None;
    }

    let mut fields = date_part.split(['-', '/']);
    let first = fields.next()?;
    let second: u32 = fields.next()?.parse().ok()?;
    let third = fields.next()?;

    let Some(time_part) = time_part else {
        if fields.next().is_some() {
            return None;
        }
        let date = if third.len() == 4 {
            NaiveDate::from_ymd_opt(third.parse().ok()?, second, first.parse().ok()?)?
        } else {
            NaiveDate::from_ymd_opt(first.parse().ok()?, second, third.parse().ok()?)?
        };
        return Some(DateTime::new(date.and_time(NaiveTime::MIN), kind));
    };
    let date = NaiveDate::from_ymd_opt(first.parse().ok()?, second, third.parse().ok()?)?;

    let (clock, offset, direction) = match time_part.split_once('+') {
        Some((clock, offset)) => (clock, Some(offset), -1),
        None => match time_part.split_once('-') {
            Some((clock, offset)) => (clock, Some(offset), 1),
            None => (time_part, None, 0),
        },
    };

    let (mut hh, mut min, mut ss, mut ms, mut sub_ms_nanos) = (0, 0, 0, 0, 0i64);
    let clock_fields: Vec<&str> = clock.split(':').collect();
    if let [h, m, s] = clock_fields.as_slice() {
        hh = h.parse().unwrap_or(0);
        min = m.parse().unwrap_or(0);
        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (*s, None),
        };
        ss = whole.parse().unwrap_or(0);
        if let Some(fraction) = fraction {
            if !fraction.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let padded = format!("{fraction:0<3}");
            ms = padded[..3].parse().ok()?;
            let rest = &padded[3..];
            if !rest.is_empty() {
                // Up to six more digits are nanoseconds below the millisecond.
                let digits = &rest[..rest.len().min(6)];
                let scaled = format!("{digits:0<6}");
                sub_ms_nanos = scaled.parse().ok()?;
            }
        }
    }

    let time = NaiveTime::from_hms_milli_opt(hh, min, ss, ms)?;
    let mut naive = date.and_time(time);
    if sub_ms_nanos != 0 {
        naive = naive.checked_add_signed(TimeDelta::nanoseconds(sub_ms_nanos))?;
    }

    if let Some(offset) = offset
        && direction != 0
    {
        if !offset.bytes().all(|b| b.is_ascii_digit() || b == b':') {
            return None;
        }
        let (oh, om): (i64, i64) = match offset.split_once(':') {
            Some((h, m)) => (h.parse().ok()?, m.parse().ok()?),
            None if offset.len() > 2 => (offset[..2].parse().ok()?, offset[2..].parse().ok()?),
            None => (offset.parse().ok()?, 0),
        };
        let shift = TimeDelta::try_hours(direction * oh)? + TimeDelta::try_minutes(direction * om)?;
        naive = naive.checked_add_signed(shift)?;
    }

    Some(DateTime::new(naive, kind))
}

// -----------------------------------------------------------------------------
// General layouts

const OFFSET_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
];

const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S%.f",
];

const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y"];

/// Reads the common layouts: RFC 3339, RFC 1123, ISO 8601 with or
/// without an offset, and slash-separated dates.
///
/// Returns the wall-clock value and its offset, a trailing `Z` being a
/// zero offset.
pub(crate) fn parse_general(text: &str) -> Option<(NaiveDateTime, Option<FixedOffset>)> {
    let text = text.trim();
    if let Ok(value) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some((value.naive_local(), Some(*value.offset())));
    }
    if let Ok(value) = chrono::DateTime::parse_from_rfc2822(text) {
        return Some((value.naive_local(), Some(*value.offset())));
    }
    for layout in OFFSET_LAYOUTS {
        if let Ok(value) = chrono::DateTime::parse_from_str(text, layout) {
            return Some((value.naive_local(), Some(*value.offset())));
        }
    }

    let (text, offset) = match text.strip_suffix('Z') {
        Some(text) => (text, Some(FixedOffset::east_opt(0)?)),
        None => (text, None),
    };
    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, layout) {
            return Some((naive, offset));
        }
    }
    for layout in DATE_LAYOUTS {
        if let Ok(date) = NaiveDate::parse_from_str(text, layout) {
            return Some((date.and_time(NaiveTime::MIN), offset));
        }
    }
    None
}

// -----------------------------------------------------------------------------
// DateTimeOffset and DateOnly

/// Reads a date with an offset.
///
/// WCF tokens carry their own offset, `-0000` meaning local time. Other
/// tokens are read as ISO 8601, a token without an offset being UTC.
pub fn parse_date_offset(text: &str, config: &Config) -> Result<chrono::DateTime<FixedOffset>> {
    if text.is_empty() {
        return Ok(chrono::DateTime::<Utc>::default().fixed_offset());
    }

    if text.starts_with(ESCAPED_WCF_PREFIX) || text.starts_with(WCF_PREFIX) {
        let (millis, zone) = split_wcf(text)?;
        let instant = chrono::DateTime::<Utc>::from_timestamp_millis(millis)
            .ok_or_else(|| invalid(text, "out of range"))?;
        let offset = if zone.is_empty() {
            FixedOffset::east_opt(0)
        } else if config.date_handler == DateHandler::DcjsCompatible || zone == UNSPECIFIED_OFFSET {
            Some(local_offset_of_utc(instant.naive_utc()))
        } else {
            offset_from_text(zone)
        };
        let offset = offset.ok_or_else(|| invalid(text, "invalid offset"))?;
        return Ok(instant.with_timezone(&offset));
    }

    let (naive, offset) = parse_general(text).ok_or_else(|| invalid(text, "unknown layout"))?;
    let offset = match offset {
        Some(offset) => offset,
        None => FixedOffset::east_opt(0).ok_or_else(|| invalid(text, "invalid offset"))?,
    };
    Ok((naive - delta_of(offset)).and_utc().with_timezone(&offset))
}

/// Reads a calendar date. Bare numbers are Unix times under the
/// `UnixTime` and `UnixTimeMs` handlers.
pub fn parse_date_only(text: &str, config: &Config) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date);
    }
    Ok(parse_date_time(text, config)?.naive().date())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike};

    use super::{parse_date_offset, parse_date_time, parse_manual};
    use crate::config::{Config, DateHandler};
    use crate::time::{DateTime, DateTimeKind};

    fn utc_config() -> Config {
        Config {
            always_use_utc: true,
            ..Config::default()
        }
    }

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn wcf_forms() {
        let config = Config::default();
        let utc = parse_date_time("\\/Date(1000)\\/", &config).unwrap();
        assert_eq!(utc, DateTime::utc(ymd_hms(1970, 1, 1, 0, 0, 1)));

        let offset = parse_date_time("/Date(0+0200)/", &config).unwrap();
        assert_eq!(offset.kind(), DateTimeKind::Local);
        assert_eq!(offset.naive(), ymd_hms(1970, 1, 1, 2, 0, 0));

        let unspecified = parse_date_time("/Date(0-0000)/", &config).unwrap();
        assert_eq!(unspecified.to_utc().naive(), ymd_hms(1970, 1, 1, 0, 0, 0));
    }

    #[test]
    fn xsd_forms() {
        let config = utc_config();
        let seconds = parse_date_time("2020-03-04T05:06:07Z", &config).unwrap();
        assert_eq!(seconds, DateTime::utc(ymd_hms(2020, 3, 4, 5, 6, 7)));

        let fraction = parse_date_time("2020-03-04T05:06:07.1234567Z", &config).unwrap();
        assert_eq!(fraction.naive().nanosecond(), 123_456_700);

        let spaced = parse_date_time("2020-03-04 05:06:07Z", &config).unwrap();
        assert_eq!(spaced, seconds);
    }

    #[test]
    fn short_forms() {
        let config = Config::default();
        let condensed = parse_date_time("20200304", &config).unwrap();
        assert_eq!(condensed, DateTime::unspecified(ymd_hms(2020, 3, 4, 0, 0, 0)));

        let short = parse_date_time("2020-03-04", &config).unwrap();
        assert_eq!(short.naive(), ymd_hms(2020, 3, 4, 0, 0, 0));
        assert_eq!(short.kind(), DateTimeKind::Local);

        let utc_short = parse_date_time("2020-03-04", &utc_config()).unwrap();
        assert_eq!(utc_short, DateTime::utc(ymd_hms(2020, 3, 4, 0, 0, 0)));
    }

    #[test]
    fn rfc1123() {
        let value = parse_date_time("Wed, 04 Mar 2020 05:06:07 GMT", &utc_config()).unwrap();
        assert_eq!(value, DateTime::utc(ymd_hms(2020, 3, 4, 5, 6, 7)));
    }

    #[test]
    fn unix_handlers() {
        let config = Config {
            date_handler: DateHandler::UnixTime,
            ..Config::default()
        };
        let value = parse_date_time("86400", &config).unwrap();
        assert_eq!(value, DateTime::utc(ymd_hms(1970, 1, 2, 0, 0, 0)));

        let config = Config {
            date_handler: DateHandler::UnixTimeMs,
            ..Config::default()
        };
        let value = parse_date_time("1500", &config).unwrap();
        assert_eq!(value.naive().nanosecond(), 500_000_000);
    }

    #[test]
    fn manual_reader_applies_offsets_arithmetically() {
        let config = utc_config();
        let value = parse_manual("2020-03-04T05:06:07.1234567+02:00", &config).unwrap();
        assert_eq!(value.kind(), DateTimeKind::Utc);
        assert_eq!(value.naive().hour(), 3);
        assert_eq!(value.naive().nanosecond(), 123_456_700);

        let day_first = parse_manual("04/03/2020", &config).unwrap();
        assert_eq!(day_first.naive(), ymd_hms(2020, 3, 4, 0, 0, 0));
        assert!(parse_manual("2020", &config).is_none());
    }

    #[test]
    fn skip_conversion_keeps_zone() {
        let config = Config {
            date_handler: DateHandler::Iso8601,
            skip_date_time_conversion: true,
            ..Config::default()
        };
        let value = parse_date_time("2020-03-04T05:06:07", &config).unwrap();
        assert_eq!(value, DateTime::unspecified(ymd_hms(2020, 3, 4, 5, 6, 7)));
    }

    #[test]
    fn errors_route_through_handler() {
        let config = Config::default();
        assert!(matches!(
            parse_date_time("not a date", &config),
            Err(crate::Error::InvalidDate { .. })
        ));

        let config = Config {
            on_date_parse_error: Some(alloc::sync::Arc::new(
                |_: &str, _: crate::Error| -> crate::Result<DateTime> { Ok(DateTime::default()) },
            )),
            ..Config::default()
        };
        assert_eq!(parse_date_time("garbage", &config).unwrap(), DateTime::default());
    }

    #[test]
    fn offsets() {
        let config = Config::default();
        let value = parse_date_offset("2020-03-04T05:06:07+02:00", &config).unwrap();
        assert_eq!(value.offset().local_minus_utc(), 7200);
        assert_eq!(value.naive_local(), ymd_hms(2020, 3, 4, 5, 6, 7));

        let assumed = parse_date_offset("2020-03-04T05:06:07", &config).unwrap();
        assert_eq!(assumed.offset().local_minus_utc(), 0);

        let wcf = parse_date_offset("\\/Date(0+0130)\\/", &config).unwrap();
        assert_eq!(wcf.offset().local_minus_utc(), 5400);
        assert_eq!(wcf.timestamp(), 0);
    }

    #[test]
    fn non_ascii_fields_are_errors() {
        let config = Config::default();
        assert!(parse_manual("2020-01-01T00:00:00.ééé", &config).is_none());
        assert!(parse_manual("2020-01-01T00:00:00.1é", &config).is_none());
        assert!(parse_manual("2020-01-01T00:00:00+éé", &config).is_none());
        assert!(parse_manual("2020-01-01T00:00:00+0é0", &config).is_none());

        assert!(parse_date_time("2020-01-01T00:00:00.ééé", &config).is_err());
        assert!(parse_date_time("/Date(0+aé)/", &config).is_err());
        assert!(parse_date_offset("\\/Date(0+éé)\\/", &config).is_err());
    }
}
