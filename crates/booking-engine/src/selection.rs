//! Selection state for one booking attempt.
//!
//! The state tracks the active day, the active slot, the chosen session
//! type and timezone, and free-text notes. Day and slot transitions are
//! validated against a [`DayIndex`] and a [`BookingWindow`]; a refused
//! transition returns a [`SelectionError`] and leaves the state untouched.
//!
//! # Invariant
//!
//! `selected_slot_id` is either `None` or the id of a slot in the bucket of
//! `selected_day`. Changing the day always clears the slot.

use serde::Serialize;
use tracing::{debug, trace};

use crate::catalog::{SessionTypeOption, TimezoneChoice, TimezoneOption};
use crate::error::SelectionError;
use crate::grouping::{DayIndex, DayKey};
use crate::slot::NormalizedSlot;
use crate::window::BookingWindow;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    selected_day: Option<DayKey>,
    selected_slot_id: Option<String>,
    selected_session_type: Option<SessionTypeOption>,
    selected_timezone: Option<TimezoneChoice>,
    notes: String,
    #[serde(skip)]
    initial_session_type: Option<SessionTypeOption>,
    #[serde(skip)]
    initial_timezone: Option<TimezoneChoice>,
}

impl SelectionState {
    /// Fresh state: no day or slot, the first session type, and the default
    /// (or first) timezone.
    pub fn new(
        session_types: &[SessionTypeOption],
        timezone_options: &[TimezoneOption],
        default_timezone: Option<&TimezoneChoice>,
    ) -> Self {
        let initial_session_type = session_types.first().cloned();
        let initial_timezone = TimezoneChoice::initial(default_timezone, timezone_options);
        SelectionState {
            selected_day: None,
            selected_slot_id: None,
            selected_session_type: initial_session_type.clone(),
            selected_timezone: initial_timezone.clone(),
            notes: String::new(),
            initial_session_type,
            initial_timezone,
        }
    }

    pub fn selected_day(&self) -> Option<DayKey> {
        self.selected_day
    }

    pub fn selected_slot_id(&self) -> Option<&str> {
        self.selected_slot_id.as_deref()
    }

    pub fn selected_session_type(&self) -> Option<&SessionTypeOption> {
        self.selected_session_type.as_ref()
    }

    pub fn selected_timezone(&self) -> Option<&TimezoneChoice> {
        self.selected_timezone.as_ref()
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// The selected slot, resolved through `index`.
    pub fn selected_slot<'a>(&self, index: &'a DayIndex) -> Option<&'a NormalizedSlot> {
        let day = self.selected_day.as_ref()?;
        let slot_id = self.selected_slot_id.as_deref()?;
        index.find_slot(day, slot_id)
    }

    /// Make `day` the active day and clear any selected slot.
    ///
    /// # Errors
    ///
    /// [`SelectionError::DayHasNoSlots`] if `index` has nothing on that day,
    /// [`SelectionError::OutsideBookingWindow`] if the window rejects it.
    pub fn select_day(
        &mut self,
        day: DayKey,
        index: &DayIndex,
        window: &BookingWindow,
    ) -> Result<(), SelectionError> {
        if !index.has_slots(&day) {
            debug!(%day, "rejecting day without slots");
            return Err(SelectionError::DayHasNoSlots(day));
        }
        if !window.contains(day.date()) {
            debug!(%day, today = %window.today(), "rejecting day outside booking window");
            return Err(SelectionError::OutsideBookingWindow(day));
        }
        trace!(%day, previous_slot = ?self.selected_slot_id, "day selected");
        self.selected_day = Some(day);
        self.selected_slot_id = None;
        Ok(())
    }

    /// Make `slot_id` the active slot.
    ///
    /// # Errors
    ///
    /// [`SelectionError::NoDaySelected`] before any day is chosen, or
    /// [`SelectionError::SlotNotInDay`] if the slot is not in that day's bucket.
    pub fn select_slot(&mut self, slot_id: &str, index: &DayIndex) -> Result<(), SelectionError> {
        let Some(day) = self.selected_day else {
            debug!(slot_id, "rejecting slot before a day is selected");
            return Err(SelectionError::NoDaySelected);
        };
        if index.find_slot(&day, slot_id).is_none() {
            debug!(slot_id, %day, "rejecting slot outside the selected day");
            return Err(SelectionError::SlotNotInDay {
                slot_id: slot_id.to_string(),
                day,
            });
        }
        trace!(slot_id, %day, "slot selected");
        self.selected_slot_id = Some(slot_id.to_string());
        Ok(())
    }

    pub fn select_session_type(&mut self, option: Option<SessionTypeOption>) {
        self.selected_session_type = option;
    }

    pub fn select_timezone(&mut self, choice: Option<TimezoneChoice>) {
        self.selected_timezone = choice;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Back to the state produced by [`SelectionState::new`].
    pub fn reset(&mut self) {
        self.selected_day = None;
        self.selected_slot_id = None;
        self.selected_session_type = self.initial_session_type.clone();
        self.selected_timezone = self.initial_timezone.clone();
        self.notes.clear();
    }

    /// Drop day/slot choices that `index` no longer supports.
    ///
    /// Used after availability is replaced: a day that lost all its slots is
    /// cleared together with its slot, and a slot that disappeared from its
    /// day is cleared on its own.
    pub fn retain_valid(&mut self, index: &DayIndex) {
        let Some(day) = self.selected_day else {
            return;
        };
        if !index.has_slots(&day) {
            debug!(%day, "selected day lost its slots");
            self.selected_day = None;
            self.selected_slot_id = None;
        } else if let Some(slot_id) = &self.selected_slot_id {
            if index.find_slot(&day, slot_id).is_none() {
                debug!(%day, slot_id = slot_id.as_str(), "selected slot no longer available");
                self.selected_slot_id = None;
            }
        }
    }

    /// Whether the core invariant holds against `index`.
    pub fn is_consistent(&self, index: &DayIndex) -> bool {
        match (&self.selected_day, &self.selected_slot_id) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(day), Some(slot_id)) => index.find_slot(day, slot_id).is_some(),
        }
    }
}
