//! Seven-day calendar viewport.
//!
//! The navigator owns only the anchor date. Slot availability comes from a
//! [`DayIndex`] and bookability from a [`BookingWindow`]; paging is not
//! bounded here so the calendar can still show days outside the window.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::grouping::{DayIndex, DayKey};
use crate::temporal::{format_week_label, local_date, shift_days};
use crate::window::BookingWindow;

/// Number of days in the viewport.
pub const VISIBLE_DAYS: usize = 7;

/// What the calendar shows for one visible day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub day: DayKey,
    pub has_slots: bool,
    pub slot_count: usize,
    /// Inside the booking window. A day with slots but outside the window
    /// is shown disabled.
    pub in_window: bool,
    pub is_today: bool,
}

impl DayView {
    /// Whether the day can actually be picked: it has slots and is bookable.
    pub fn selectable(&self) -> bool {
        self.has_slots && self.in_window
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarNavigator {
    anchor: NaiveDate,
}

impl CalendarNavigator {
    pub fn new(anchor: NaiveDate) -> Self {
        CalendarNavigator { anchor }
    }

    /// Anchor the viewport on the local date of `now`.
    pub fn starting_today(now: DateTime<Utc>, tz: &Tz) -> Self {
        CalendarNavigator::new(local_date(&now, tz))
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn page_forward(&mut self) {
        self.page_by(1);
    }

    pub fn page_backward(&mut self) {
        self.page_by(-1);
    }

    /// Move by `weeks` whole pages in one step; negative pages back.
    ///
    /// A shift past chrono's date range leaves the anchor unchanged.
    pub fn page_by(&mut self, weeks: i64) {
        let anchor = weeks
            .checked_mul(VISIBLE_DAYS as i64)
            .and_then(|days| shift_days(self.anchor, days));
        if let Some(anchor) = anchor {
            self.anchor = anchor;
        }
    }

    /// The anchor and the six days after it.
    pub fn visible_days(&self) -> [NaiveDate; VISIBLE_DAYS] {
        std::array::from_fn(|offset| {
            shift_days(self.anchor, offset as i64).unwrap_or(NaiveDate::MAX)
        })
    }

    /// Per-day summary of the visible week.
    pub fn week(&self, index: &DayIndex, window: &BookingWindow) -> [DayView; VISIBLE_DAYS] {
        self.visible_days().map(|date| {
            let day = DayKey::new(date);
            let slot_count = index.slot_count(&day);
            DayView {
                day,
                has_slots: slot_count > 0,
                slot_count,
                in_window: window.contains(date),
                is_today: date == window.today(),
            }
        })
    }

    /// Title for the viewport, e.g. `"Jun 1 - Jun 7, 2024"`.
    pub fn week_label(&self) -> String {
        let days = self.visible_days();
        format_week_label(days[0], days[VISIBLE_DAYS - 1])
    }
}
