//! Shared date and time helpers for the booking engine.
//!
//! Every function here is pure: the caller supplies the instant and the
//! display timezone. Nothing reads the system clock, so "today" is always
//! derived from an injected `now`.
//!
//! # Functions
//!
//! - [`parse_instant`]: Parse availability text into a UTC instant
//! - [`parse_timezone`]: Validate an IANA timezone name
//! - [`iso_millis`]: Millisecond-precision UTC rendering used for slot ids
//! - [`format_time_of_day`]: 12-hour clock label ("2:30 PM")
//! - [`local_date`]: Instant → local calendar day
//! - [`format_week_label`]: Human title for a 7-day viewport

use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::error::{BookingError, Result};

/// Naive datetime layouts accepted after RFC 3339 fails, most specific first.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

// ── Parsing ─────────────────────────────────────────────────────────────────

/// Parse an availability timestamp into a UTC instant.
///
/// Accepted shapes, tried in order:
///
/// 1. RFC 3339 with an offset or `Z` (`"2024-06-03T09:00:00Z"`)
/// 2. A naive local datetime (`"2024-06-03T09:00"`), interpreted in `tz`
/// 3. A bare date (`"2024-06-03"`), interpreted as UTC midnight
///
/// # Errors
///
/// Returns [`BookingError::InvalidDatetime`] if none of the shapes match, or
/// if a naive local time falls into a DST gap in `tz`.
///
/// # Examples
///
/// ```
/// use booking_engine::temporal::parse_instant;
///
/// let dt = parse_instant("2024-05-01T14:30:00Z", &chrono_tz::UTC).unwrap();
/// assert_eq!(dt.to_rfc3339(), "2024-05-01T14:30:00+00:00");
/// assert!(parse_instant("not-a-date", &chrono_tz::UTC).is_err());
/// ```
pub fn parse_instant(s: &str, tz: &Tz) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return Err(BookingError::InvalidDatetime("empty datetime".to_string()));
    }

    if let Ok(dt) = parse_rfc3339(s) {
        return Ok(dt);
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| {
                    BookingError::InvalidDatetime(format!(
                        "'{s}' does not exist in {}",
                        tz.name()
                    ))
                });
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    Err(BookingError::InvalidDatetime(format!(
        "'{s}': expected RFC 3339, YYYY-MM-DDTHH:MM[:SS] or YYYY-MM-DD"
    )))
}

/// Parse an RFC 3339 datetime string into `DateTime<Utc>`.
pub fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| BookingError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| BookingError::InvalidTimezone(format!("'{}'", s)))
}

/// Convert epoch milliseconds into an instant, if representable.
pub fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

// ── Formatting ──────────────────────────────────────────────────────────────

/// Render an instant as millisecond-precision UTC (`2024-05-01T14:30:00.000Z`).
///
/// Stable for a given instant, which is what makes derived slot ids
/// reproducible.
pub fn iso_millis(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Format the local time of day on a 12-hour clock, e.g. `"2:30 PM"`.
pub fn format_time_of_day(dt: &DateTime<Utc>, tz: &Tz) -> String {
    dt.with_timezone(tz).format("%-I:%M %p").to_string()
}

/// Title for a run of days, e.g. `"Jun 1 - Jun 7, 2024"` or
/// `"Dec 29, 2024 - Jan 4, 2025"` when the run crosses a year.
pub fn format_week_label(first: NaiveDate, last: NaiveDate) -> String {
    if first.year() == last.year() {
        format!(
            "{} - {}",
            first.format("%b %-d"),
            last.format("%b %-d, %Y")
        )
    } else {
        format!(
            "{} - {}",
            first.format("%b %-d, %Y"),
            last.format("%b %-d, %Y")
        )
    }
}

/// Format a whole number of minutes, e.g. `"45 min"`, `"1 h"`, `"1 h 30 min"`.
pub fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h} h"),
        (h, m) => format!("{h} h {m} min"),
    }
}

// ── Calendar days ───────────────────────────────────────────────────────────

/// The calendar date of an instant as seen in `tz`.
pub fn local_date(dt: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    dt.with_timezone(tz).date_naive()
}

/// Shift a date by whole days, or `None` past chrono's representable range.
pub fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(days)?)
}

// ── Tests ───────────────────────────────────────────────────────────────────
