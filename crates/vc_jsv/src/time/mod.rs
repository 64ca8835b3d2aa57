//! Date and time codec.
//!
//! Temporal scalars are written in one of several text encodings chosen by
//! [`Config::date_handler`](crate::config::Config::date_handler) and read
//! back by detecting the encoding from the token itself, whatever the
//! active handler. See [`parse_date_time`] for the detection order.
//!
//! [`DateTime`] is a calendar value plus a [`DateTimeKind`] telling whether
//! it is UTC, local time of this machine, or of unknown zone. The kind is
//! what decides the offset written next to the value, and the
//! `assume_utc`, `always_use_utc` and `skip_date_time_conversion` flags of
//! the active config decide how a parsed value is converted.
//!
//! ```
//! use vc_jsv::time::{DateTime, DateTimeKind};
//!
//! let date = DateTime::from_ymd_hms(2024, 2, 29, 13, 5, 0, DateTimeKind::Utc).unwrap();
//! assert_eq!(vc_jsv::to_jsv(&date), "2024-02-29T13:05:00Z");
//! assert_eq!(vc_jsv::to_json(&date), r#""\/Date(1709211900000)\/""#);
//! ```

// -----------------------------------------------------------------------------
// Modules

mod parse;
mod span;
mod write;

// -----------------------------------------------------------------------------
// Exports

pub use parse::{parse_date_only, parse_date_offset, parse_date_time, parse_manual};
pub use span::{parse_time_span, to_standard_time_span, to_xsd_duration};
pub use write::{to_iso8601_round_trip, to_shortest_xsd, to_wcf_date};
pub use write::{write_date_offset, write_date_only, write_date_time, write_time_span};

use alloc::string::String;
use core::fmt;

use chrono::{FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};

// -----------------------------------------------------------------------------
// Constants

/// Ticks are the 100 ns units of the 7-digit fraction.
pub(crate) const NANOS_PER_TICK: u32 = 100;

// -----------------------------------------------------------------------------
// DateTimeKind

/// The zone a [`DateTime`] is expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DateTimeKind {
    /// No zone information. Converted as local time when an instant is
    /// needed.
    #[default]
    Unspecified,
    Utc,
    /// Local time of this machine.
    Local,
}

// -----------------------------------------------------------------------------
// DateTime

/// A calendar date and time with its [`DateTimeKind`].
///
/// Equality compares both the calendar value and the kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DateTime {
    naive: NaiveDateTime,
    kind: DateTimeKind,
}

impl DateTime {
    #[inline]
    pub const fn new(naive: NaiveDateTime, kind: DateTimeKind) -> Self {
        Self { naive, kind }
    }

    #[inline]
    pub const fn utc(naive: NaiveDateTime) -> Self {
        Self::new(naive, DateTimeKind::Utc)
    }

    #[inline]
    pub const fn local(naive: NaiveDateTime) -> Self {
        Self::new(naive, DateTimeKind::Local)
    }

    #[inline]
    pub const fn unspecified(naive: NaiveDateTime) -> Self {
        Self::new(naive, DateTimeKind::Unspecified)
    }

    /// Builds a value from calendar fields, `None` if they are out of range.
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
        kind: DateTimeKind,
    ) -> Option<Self> {
        let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, min, sec)?;
        Some(Self::new(naive, kind))
    }

    /// The UTC instant `ms` milliseconds after the Unix epoch.
    pub fn from_unix_millis(ms: i64) -> Option<Self> {
        chrono::DateTime::<Utc>::from_timestamp_millis(ms).map(|dt| Self::utc(dt.naive_utc()))
    }

    /// The UTC instant `secs` seconds after the Unix epoch.
    pub fn from_unix_seconds(secs: i64) -> Option<Self> {
        chrono::DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| Self::utc(dt.naive_utc()))
    }

    /// The current local time.
    pub fn now() -> Self {
        Self::local(Local::now().naive_local())
    }

    #[inline]
    pub const fn naive(&self) -> NaiveDateTime {
        self.naive
    }

    #[inline]
    pub const fn kind(&self) -> DateTimeKind {
        self.kind
    }

    /// Relabels the value without converting it.
    #[inline]
    pub const fn with_kind(self, kind: DateTimeKind) -> Self {
        Self::new(self.naive, kind)
    }

    /// Converts to UTC. An unspecified value is read as local time.
    pub fn to_utc(self) -> Self {
        match self.kind {
            DateTimeKind::Utc => self,
            DateTimeKind::Local | DateTimeKind::Unspecified => {
                let offset = local_offset_of_local(self.naive);
                Self::utc(self.naive - delta_of(offset))
            }
        }
    }

    /// Converts to local time. An unspecified value is read as UTC.
    pub fn to_local(self) -> Self {
        match self.kind {
            DateTimeKind::Local => self,
            DateTimeKind::Utc | DateTimeKind::Unspecified => {
                let offset = local_offset_of_utc(self.naive);
                Self::local(self.naive + delta_of(offset))
            }
        }
    }

    /// The UTC offset the value is written with: zero for UTC, the local
    /// offset otherwise.
    pub fn offset(&self) -> FixedOffset {
        match self.kind {
            DateTimeKind::Utc => Utc.fix(),
            DateTimeKind::Local | DateTimeKind::Unspecified => local_offset_of_local(self.naive),
        }
    }

    /// Milliseconds since the Unix epoch of the UTC instant.
    pub fn unix_millis(&self) -> i64 {
        self.to_utc().naive.and_utc().timestamp_millis()
    }

    /// Whole seconds since the Unix epoch of the UTC instant.
    pub fn unix_seconds(&self) -> i64 {
        self.to_utc().naive.and_utc().timestamp()
    }

    /// Adds a span without changing the kind.
    pub fn checked_add(self, delta: TimeDelta) -> Option<Self> {
        Some(Self::new(self.naive.checked_add_signed(delta)?, self.kind))
    }
}

impl From<NaiveDateTime> for DateTime {
    #[inline]
    fn from(naive: NaiveDateTime) -> Self {
        Self::unspecified(naive)
    }
}

impl From<chrono::DateTime<Utc>> for DateTime {
    #[inline]
    fn from(value: chrono::DateTime<Utc>) -> Self {
        Self::utc(value.naive_utc())
    }
}

impl From<chrono::DateTime<Local>> for DateTime {
    #[inline]
    fn from(value: chrono::DateTime<Local>) -> Self {
        Self::local(value.naive_local())
    }
}

impl From<DateTime> for chrono::DateTime<Utc> {
    #[inline]
    fn from(value: DateTime) -> Self {
        value.to_utc().naive.and_utc()
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_iso8601_round_trip(self))
    }
}

// -----------------------------------------------------------------------------
// Local offsets

#[inline]
fn delta_of(offset: FixedOffset) -> TimeDelta {
    TimeDelta::seconds(i64::from(offset.local_minus_utc()))
}

/// The local offset in effect at a UTC instant.
pub(crate) fn local_offset_of_utc(naive: NaiveDateTime) -> FixedOffset {
    Local.offset_from_utc_datetime(&naive)
}

/// The local offset in effect at a local wall-clock time. Skipped wall times
/// use the offset of the same numbers read as UTC.
pub(crate) fn local_offset_of_local(naive: NaiveDateTime) -> FixedOffset {
    Local
        .offset_from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Local.offset_from_utc_datetime(&naive))
}

/// `+hhmm` or `-hhmm`.
pub(crate) fn offset_to_compact(offset: FixedOffset, out: &mut String) {
    use core::fmt::Write;
    let secs = offset.local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let mins = secs.unsigned_abs() / 60;
    let _ = write!(out, "{sign}{:02}{:02}", mins / 60, mins % 60);
}

/// Reads `+hhmm`, `+hh:mm` or `+hh`.
pub(crate) fn offset_from_text(text: &str) -> Option<FixedOffset> {
    let (sign, digits) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => (1, text),
    };
    if !digits.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return None;
    }
    let (hours, mins) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if digits.len() > 2 => digits.split_at(2),
        None => (digits, "0"),
    };
    let hours: i32 = hours.parse().ok()?;
    let mins: i32 = mins.parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + mins * 60))
}

// -----------------------------------------------------------------------------
// Tests
