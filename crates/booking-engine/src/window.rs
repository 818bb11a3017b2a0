//! Rolling booking-window policy.
//!
//! A day is bookable when it lies between today and today plus the
//! horizon, inclusive on both ends. This check is independent of whether
//! the day has any slots.
//!
//! An unset or zero horizon means the window is open-ended: every day is
//! selectable, past days included. Published scheduling settings rely on
//! `0` meaning "no limit", so it is not read as a today-only window.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::temporal::{local_date, shift_days};

/// Horizon used when a mentor has not configured one.
pub const DEFAULT_HORIZON_DAYS: u32 = 21;

/// How far ahead a day may be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingWindowPolicy {
    pub horizon_days: Option<u32>,
}

impl Default for BookingWindowPolicy {
    fn default() -> Self {
        BookingWindowPolicy {
            horizon_days: Some(DEFAULT_HORIZON_DAYS),
        }
    }
}

impl BookingWindowPolicy {
    pub fn new(horizon_days: Option<u32>) -> Self {
        BookingWindowPolicy { horizon_days }
    }

    /// A policy with no upper bound.
    pub fn open_ended() -> Self {
        BookingWindowPolicy { horizon_days: None }
    }

    /// The effective horizon, `None` when the window is open-ended.
    pub fn effective_horizon(&self) -> Option<u32> {
        self.horizon_days.filter(|&d| d > 0)
    }

    /// Last selectable day counted from `today`, `None` when open-ended.
    pub fn last_day(&self, today: NaiveDate) -> Option<NaiveDate> {
        let horizon = self.effective_horizon()?;
        Some(shift_days(today, i64::from(horizon)).unwrap_or(NaiveDate::MAX))
    }
}

/// Whether `day` may be selected given the local date `today`.
///
/// # Examples
///
/// ```
/// use booking_engine::window::{is_selectable, BookingWindowPolicy};
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// let policy = BookingWindowPolicy::default(); // 21 days
/// assert!(is_selectable(NaiveDate::from_ymd_opt(2024, 5, 22).unwrap(), today, &policy));
/// assert!(!is_selectable(NaiveDate::from_ymd_opt(2024, 5, 23).unwrap(), today, &policy));
/// ```
pub fn is_selectable(day: NaiveDate, today: NaiveDate, policy: &BookingWindowPolicy) -> bool {
    match policy.last_day(today) {
        None => true,
        Some(last) => today <= day && day <= last,
    }
}

/// A policy pinned to a concrete "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    today: NaiveDate,
    policy: BookingWindowPolicy,
}

impl BookingWindow {
    /// Pin `policy` to the local date of `now` in `tz`.
    pub fn new(now: DateTime<Utc>, tz: &Tz, policy: BookingWindowPolicy) -> Self {
        BookingWindow {
            today: local_date(&now, tz),
            policy,
        }
    }

    pub fn from_today(today: NaiveDate, policy: BookingWindowPolicy) -> Self {
        BookingWindow { today, policy }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn policy(&self) -> &BookingWindowPolicy {
        &self.policy
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.policy.last_day(self.today)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        is_selectable(day, self.today, &self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Los_Angeles;
    use chrono_tz::UTC;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_boundaries_with_default_horizon() {
        let today = date(2024, 5, 1);
        let policy = BookingWindowPolicy::new(Some(21));
        assert!(is_selectable(date(2024, 5, 1), today, &policy));
        assert!(is_selectable(date(2024, 5, 22), today, &policy));
        assert!(!is_selectable(date(2024, 5, 23), today, &policy));
        assert!(!is_selectable(date(2024, 4, 30), today, &policy));
    }

    #[test]
    fn test_default_policy_is_21_days() {
        assert_eq!(BookingWindowPolicy::default().horizon_days, Some(21));
    }

    #[test]
    fn test_zero_horizon_is_open_ended() {
        // Zero is treated like an unset horizon, not as "today only".
        let today = date(2024, 5, 1);
        let policy = BookingWindowPolicy::new(Some(0));
        assert_eq!(policy.effective_horizon(), None);
        assert!(is_selectable(date(2024, 5, 2), today, &policy));
        assert!(is_selectable(date(2025, 1, 1), today, &policy));
        assert!(is_selectable(date(2024, 4, 1), today, &policy));
    }

    #[test]
    fn test_unset_horizon_is_open_ended() {
        let today = date(2024, 5, 1);
        let policy = BookingWindowPolicy::open_ended();
        assert!(is_selectable(date(2030, 1, 1), today, &policy));
        assert!(is_selectable(date(2020, 1, 1), today, &policy));
        assert_eq!(policy.last_day(today), None);
    }

    #[test]
    fn test_one_day_horizon() {
        let today = date(2024, 5, 1);
        let policy = BookingWindowPolicy::new(Some(1));
        assert!(is_selectable(date(2024, 5, 2), today, &policy));
        assert!(!is_selectable(date(2024, 5, 3), today, &policy));
    }

    #[test]
    fn test_window_uses_local_today() {
        // 03:00 UTC on May 2 is still May 1 in Los Angeles
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 3, 0, 0).unwrap();
        let la = BookingWindow::new(now, &Los_Angeles, BookingWindowPolicy::default());
        let utc = BookingWindow::new(now, &UTC, BookingWindowPolicy::default());
        assert_eq!(la.today(), date(2024, 5, 1));
        assert!(la.contains(date(2024, 5, 1)));
        assert!(!utc.contains(date(2024, 5, 1)));
        assert_eq!(la.last_day(), Some(date(2024, 5, 22)));
    }

    #[test]
    fn test_policy_deserializes_camel_case() {
        let policy: BookingWindowPolicy =
            serde_json::from_str(r#"{ "horizonDays": 14 }"#).unwrap();
        assert_eq!(policy.effective_horizon(), Some(14));
    }
}
