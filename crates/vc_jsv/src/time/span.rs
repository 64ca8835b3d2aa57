use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use chrono::TimeDelta;

use crate::time::NANOS_PER_TICK;
use crate::{Error, Result};

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 3600;
const SECS_PER_DAY: u64 = 86_400;

fn invalid(text: &str) -> Error {
    Error::invalid("time span", text)
}

/// Splits a span into its sign, whole seconds and ticks.
fn parts_of(value: &TimeDelta) -> (bool, u64, u32) {
    let negative = *value < TimeDelta::zero();
    let abs = value.abs();
    let secs = abs.num_seconds().unsigned_abs();
    let ticks = abs.subsec_nanos().unsigned_abs() / NANOS_PER_TICK;
    (negative, secs, ticks)
}

fn span_of(negative: bool, secs: u64, nanos: u32) -> Option<TimeDelta> {
    let secs = i64::try_from(secs).ok()?;
    let span = TimeDelta::new(secs, nanos)?;
    Some(if negative { -span } else { span })
}

// -----------------------------------------------------------------------------
// Write

/// Writes an XSD duration: `P1DT2H3M4.5S`, `-PT0.25S`, `PT0S` for zero.
///
/// Days are the largest unit. Seconds keep up to seven fraction digits
/// with trailing zeros removed.
pub fn to_xsd_duration(value: &TimeDelta) -> String {
    let (negative, total, ticks) = parts_of(value);
    let mut out = String::from(if negative { "-P" } else { "P" });

    let days = total / SECS_PER_DAY;
    let hours = total % SECS_PER_DAY / SECS_PER_HOUR;
    let minutes = total % SECS_PER_HOUR / SECS_PER_MINUTE;
    let seconds = total % SECS_PER_MINUTE;

    if days > 0 {
        let _ = write!(out, "{days}D");
    }
    if days == 0 || hours + minutes + seconds > 0 || ticks > 0 {
        out.push('T');
        if hours > 0 {
            let _ = write!(out, "{hours}H");
        }
        if minutes > 0 {
            let _ = write!(out, "{minutes}M");
        }
        if seconds > 0 || ticks > 0 {
            let _ = write!(out, "{seconds}");
            if ticks > 0 {
                let fraction = format!("{ticks:07}");
                out.push('.');
                out.push_str(fraction.trim_end_matches('0'));
            }
            out.push('S');
        } else if hours == 0 && minutes == 0 {
            out.push_str("0S");
        }
    }
    out
}

/// Writes `[-][d.]hh:mm:ss[.fffffff]`.
pub fn to_standard_time_span(value: &TimeDelta) -> String {
    let (negative, total, ticks) = parts_of(value);
    let mut out = String::with_capacity(26);
    if negative {
        out.push('-');
    }
    let days = total / SECS_PER_DAY;
    if days > 0 {
        let _ = write!(out, "{days}.");
    }
    let _ = write!(
        out,
        "{:02}:{:02}:{:02}",
        total % SECS_PER_DAY / SECS_PER_HOUR,
        total % SECS_PER_HOUR / SECS_PER_MINUTE,
        total % SECS_PER_MINUTE
    );
    if ticks > 0 {
        let _ = write!(out, ".{ticks:07}");
    }
    out
}

// -----------------------------------------------------------------------------
// Parse

/// Reads a span written in any supported form.
///
/// - `P` or `-P` starts an XSD duration;
/// - text with a `:` is the standard clock form;
/// - anything else is a number of seconds.
pub fn parse_time_span(text: &str) -> Result<TimeDelta> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(TimeDelta::zero());
    }
    let parsed = if text.starts_with('P') || text.starts_with("-P") {
        parse_xsd(text)
    } else if text.contains(':') {
        parse_standard(text)
    } else {
        parse_seconds(text)
    };
    parsed.ok_or_else(|| invalid(text))
}

/// Reads a count of `unit` seconds, `None` on overflow.
fn scaled(text: &str, unit: u64) -> Option<u64> {
    text.parse::<u64>().ok()?.checked_mul(unit)
}

/// Reads `whole[.fraction]` into seconds and nanoseconds.
fn decimal_seconds(text: &str) -> Option<(u64, u32)> {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };
    let whole = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    if fraction.is_empty() {
        return Some((whole, 0));
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits = &fraction[..fraction.len().min(9)];
    let nanos = format!("{digits:0<9}").parse().ok()?;
    Some((whole, nanos))
}

fn parse_xsd(text: &str) -> Option<TimeDelta> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let rest = rest.strip_prefix('P')?;
    let (date, time) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut secs: u64 = 0;
    if let Some((days, _)) = date.split_once('D') {
        secs = scaled(days, SECS_PER_DAY)?;
    }

    let mut nanos = 0;
    if let Some(mut time) = time {
        if let Some((hours, tail)) = time.split_once('H') {
            secs = secs.checked_add(scaled(hours, SECS_PER_HOUR)?)?;
            time = tail;
        }
        if let Some((minutes, tail)) = time.split_once('M') {
            secs = secs.checked_add(scaled(minutes, SECS_PER_MINUTE)?)?;
            time = tail;
        }
        if let Some((seconds, _)) = time.split_once('S') {
            let (whole, fraction) = decimal_seconds(seconds)?;
            secs = secs.checked_add(whole)?;
            nanos = fraction;
        }
    }
    span_of(negative, secs, nanos)
}

fn parse_standard(text: &str) -> Option<TimeDelta> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let fields: Vec<&str> = rest.split(':').collect();
    let (head, minutes, seconds) = match fields.as_slice() {
        [head, minutes] => (*head, *minutes, "0"),
        [head, minutes, seconds] => (*head, *minutes, *seconds),
        _ => return None,
    };
    let (days, hours) = match head.split_once('.') {
        Some((days, hours)) => (days.parse::<u64>().ok()?, hours.parse::<u64>().ok()?),
        None => (0, head.parse::<u64>().ok()?),
    };
    let minutes: u64 = minutes.parse().ok()?;
    let (whole, nanos) = decimal_seconds(seconds)?;
    if hours > 23 || minutes > 59 || whole > 59 {
        return None;
    }
    let secs = days
        .checked_mul(SECS_PER_DAY)?
        .checked_add(hours * SECS_PER_HOUR + minutes * SECS_PER_MINUTE + whole)?;
    span_of(negative, secs, nanos)
}

fn parse_seconds(text: &str) -> Option<TimeDelta> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (whole, nanos) = decimal_seconds(rest)?;
    span_of(negative, whole, nanos)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::{parse_time_span, to_standard_time_span, to_xsd_duration};

    fn span(secs: i64, millis: i64) -> TimeDelta {
        TimeDelta::seconds(secs) + TimeDelta::milliseconds(millis)
    }

    #[test]
    fn xsd_durations() {
        assert_eq!(to_xsd_duration(&TimeDelta::zero()), "PT0S");
        assert_eq!(to_xsd_duration(&span(93_784, 500)), "P1DT2H3M4.5S");
        assert_eq!(to_xsd_duration(&span(0, -250)), "-PT0.25S");
        assert_eq!(to_xsd_duration(&span(86_400, 0)), "P1D");
        assert_eq!(to_xsd_duration(&span(3600, 0)), "PT1H");

        assert_eq!(parse_time_span("P1DT2H3M4.5S").unwrap(), span(93_784, 500));
        assert_eq!(parse_time_span("-PT0.25S").unwrap(), span(0, -250));
        assert_eq!(parse_time_span("PT0S").unwrap(), TimeDelta::zero());
        assert_eq!(parse_time_span("P2D").unwrap(), span(172_800, 0));
    }

    #[test]
    fn standard_format() {
        assert_eq!(to_standard_time_span(&span(93_784, 500)), "1.02:03:04.5000000");
        assert_eq!(to_standard_time_span(&span(-61, 0)), "-00:01:01");

        assert_eq!(parse_time_span("1.02:03:04.5").unwrap(), span(93_784, 500));
        assert_eq!(parse_time_span("-00:01:01").unwrap(), span(-61, 0));
        assert_eq!(parse_time_span("10:30").unwrap(), span(37_800, 0));
        assert!(parse_time_span("25:00:00").is_err());
    }

    #[test]
    fn bare_seconds() {
        assert_eq!(parse_time_span("1.25").unwrap(), span(1, 250));
        assert_eq!(parse_time_span("-3").unwrap(), span(-3, 0));
        assert!(parse_time_span("abc").is_err());
    }

    #[test]
    fn overflowing_spans_are_errors() {
        assert!(parse_time_span("P18446744073709551615D").is_err());
        assert!(parse_time_span("P1DT18446744073709551615H").is_err());
        assert!(parse_time_span("PT18446744073709551615S").is_err());
        assert!(parse_time_span("18446744073709551615.00:00:00").is_err());
        assert!(parse_time_span("P100000000000000D").is_err());
    }
}
