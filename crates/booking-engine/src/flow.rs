//! One booking attempt, end to end.
//!
//! [`BookingFlow`] owns the inputs, the day index built from them, the
//! calendar viewport and the selection state. It is created fresh for each
//! attempt and consumed by [`BookingFlow::submit`] or
//! [`BookingFlow::cancel`].

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, info};

use crate::catalog::{SessionTypeOption, TimezoneChoice, TimezoneOption};
use crate::config::BookingInputs;
use crate::error::{BookingError, SelectionError};
use crate::grouping::{DayIndex, DayKey};
use crate::navigator::{CalendarNavigator, DayView, VISIBLE_DAYS};
use crate::request::{build_request, BookingRequest, BookingSink, MentorIdentity};
use crate::selection::SelectionState;
use crate::slot::{normalize_all, AvailabilityInput, NormalizedSlot};
use crate::window::BookingWindow;

#[derive(Debug, Clone)]
pub struct BookingFlow<M> {
    tz: Tz,
    window: BookingWindow,
    mentor: M,
    session_types: Vec<SessionTypeOption>,
    timezone_options: Vec<TimezoneOption>,
    index: DayIndex,
    navigator: CalendarNavigator,
    selection: SelectionState,
}

impl<M> BookingFlow<M>
where
    M: MentorIdentity + Clone,
{
    /// Start a booking attempt at `now`.
    ///
    /// The viewport opens on today's week and the selection starts from the
    /// catalog defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidTimezone`] if the configured display
    /// timezone is not a known IANA name.
    ///
    /// # Examples
    ///
    /// ```
    /// use booking_engine::{BookingFlow, BookingInputs, MentorRef, SessionTypeOption};
    ///
    /// let mut inputs = BookingInputs::new(
    ///     MentorRef::new("m-1"),
    ///     vec!["2024-06-03T09:00:00Z".into(), "2024-06-03T10:00:00Z".into()],
    /// );
    /// inputs.session_types.push(SessionTypeOption::new("intro", "Intro call"));
    ///
    /// let now = "2024-06-01T08:00:00Z".parse().unwrap();
    /// let mut flow = BookingFlow::new(inputs, now).unwrap();
    /// flow.select_day("2024-06-03".parse().unwrap()).unwrap();
    /// flow.select_slot("2024-06-03T09:00:00.000Z-2024-06-03T09:00:00.000Z").unwrap();
    ///
    /// let request = flow.build_request().unwrap();
    /// assert_eq!(request.session_type.id, "intro");
    /// ```
    pub fn new(inputs: BookingInputs<M>, now: DateTime<Utc>) -> Result<Self, BookingError> {
        let tz = inputs.config.timezone()?;
        let window = BookingWindow::new(now, &tz, inputs.config.policy());
        let index = DayIndex::build(normalize_all(&inputs.availability, &tz), &tz);
        let selection = SelectionState::new(
            &inputs.session_types,
            &inputs.timezone_options,
            inputs.default_timezone.as_ref(),
        );
        debug!(
            mentor = inputs.mentor.mentor_id(),
            days = index.days().count(),
            slots = index.total_slots(),
            timezone = tz.name(),
            "booking flow started"
        );
        Ok(BookingFlow {
            tz,
            window,
            mentor: inputs.mentor,
            session_types: inputs.session_types,
            timezone_options: inputs.timezone_options,
            index,
            navigator: CalendarNavigator::new(window.today()),
            selection,
        })
    }

    // ── Read access ─────────────────────────────────────────────────────

    pub fn index(&self) -> &DayIndex {
        &self.index
    }

    pub fn window(&self) -> &BookingWindow {
        &self.window
    }

    pub fn navigator(&self) -> &CalendarNavigator {
        &self.navigator
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn session_types(&self) -> &[SessionTypeOption] {
        &self.session_types
    }

    pub fn timezone_options(&self) -> &[TimezoneOption] {
        &self.timezone_options
    }

    pub fn display_timezone(&self) -> Tz {
        self.tz
    }

    /// The visible week with per-day availability and bookability.
    pub fn visible_week(&self) -> [DayView; VISIBLE_DAYS] {
        self.navigator.week(&self.index, &self.window)
    }

    /// Slots on the selected day, empty when no day is selected.
    pub fn slots_for_selected_day(&self) -> &[NormalizedSlot] {
        match self.selection.selected_day() {
            Some(day) => self.index.bucket(&day),
            None => &[],
        }
    }

    pub fn selected_slot(&self) -> Option<&NormalizedSlot> {
        self.selection.selected_slot(&self.index)
    }

    // ── Navigation ──────────────────────────────────────────────────────

    pub fn page_forward(&mut self) {
        self.navigator.page_forward();
    }

    pub fn page_backward(&mut self) {
        self.navigator.page_backward();
    }

    pub fn page_by(&mut self, weeks: i64) {
        self.navigator.page_by(weeks);
    }

    // ── Selection ───────────────────────────────────────────────────────

    pub fn select_day(&mut self, day: DayKey) -> Result<(), SelectionError> {
        self.selection.select_day(day, &self.index, &self.window)
    }

    pub fn select_slot(&mut self, slot_id: &str) -> Result<(), SelectionError> {
        self.selection.select_slot(slot_id, &self.index)
    }

    /// Select a slot by id alone, switching to its day first.
    ///
    /// The day switch goes through the same window check as
    /// [`BookingFlow::select_day`]; if either step is refused nothing changes.
    pub fn choose_slot(&mut self, slot_id: &str) -> Result<(), SelectionError> {
        let (day, _) = self
            .index
            .locate(slot_id)
            .ok_or_else(|| SelectionError::UnknownSlot(slot_id.to_string()))?;
        let mut next = self.selection.clone();
        next.select_day(day, &self.index, &self.window)?;
        next.select_slot(slot_id, &self.index)?;
        self.selection = next;
        Ok(())
    }

    pub fn select_session_type(&mut self, option: Option<SessionTypeOption>) {
        self.selection.select_session_type(option);
    }

    /// Select a session type from the mentor's catalog by id.
    pub fn select_session_type_by_id(&mut self, id: &str) -> Result<(), SelectionError> {
        let option = self
            .session_types
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| SelectionError::UnknownSessionType(id.to_string()))?;
        self.selection.select_session_type(Some(option));
        Ok(())
    }

    /// Select a timezone. A value matching a catalog option selects that
    /// option; anything else is kept as a raw identifier.
    pub fn select_timezone(&mut self, value: &str) {
        let choice = self
            .timezone_options
            .iter()
            .find(|opt| opt.value == value)
            .cloned()
            .map(TimezoneChoice::Option)
            .unwrap_or_else(|| TimezoneChoice::Raw(value.to_string()));
        self.selection.select_timezone(Some(choice));
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.selection.set_notes(notes);
    }

    pub fn reset(&mut self) {
        self.selection.reset();
    }

    /// Replace the availability snapshot.
    ///
    /// The index is rebuilt from scratch and any day or slot choice the new
    /// snapshot no longer supports is dropped.
    pub fn set_availability(&mut self, availability: &[AvailabilityInput]) {
        self.index = DayIndex::build(normalize_all(availability, &self.tz), &self.tz);
        self.selection.retain_valid(&self.index);
    }

    // ── Completion ──────────────────────────────────────────────────────

    /// The request the current selection would produce, if complete.
    pub fn build_request(&self) -> Option<BookingRequest<M>> {
        build_request(&self.selection, &self.index, &self.mentor)
    }

    /// Hand the request to `sink`, ending the attempt.
    ///
    /// On an incomplete selection or a sink failure the flow is returned
    /// alongside the error so the caller can keep going.
    pub fn submit<S>(self, sink: &mut S) -> Result<BookingRequest<M>, (Self, BookingError)>
    where
        S: BookingSink<M>,
    {
        let Some(request) = self.build_request() else {
            return Err((self, BookingError::Incomplete));
        };
        if let Err(e) = sink.submit(request.clone()) {
            return Err((self, BookingError::Sink(e.to_string())));
        }
        info!(
            mentor = request.mentor_id.as_str(),
            slot = request.slot.id.as_str(),
            session_type = request.session_type.id.as_str(),
            "booking request submitted"
        );
        Ok(request)
    }

    /// Close the flow without booking. Nothing is kept.
    pub fn cancel(self) {
        debug!(mentor = self.mentor.mentor_id(), "booking flow cancelled");
    }
}
