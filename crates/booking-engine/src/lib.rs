//! # booking-engine
//!
//! Deterministic availability scheduling for mentor session booking.
//!
//! The engine takes a mentor's published availability and turns it into a
//! weekly calendar a mentee can pick from, then into a booking request. It
//! performs no I/O: availability, catalogs, configuration and the current
//! instant all come in as plain values, and the finished request goes out
//! through a [`BookingSink`].
//!
//! ## Modules
//!
//! - [`slot`] — Raw availability entries → normalized slots
//! - [`grouping`] — Slots bucketed by local calendar day
//! - [`navigator`] — Seven-day viewport paged by whole weeks
//! - [`window`] — Rolling booking-window policy
//! - [`selection`] — Day/slot/session-type/timezone selection state machine
//! - [`request`] — Booking request assembly and the sink seam
//! - [`flow`] — One booking attempt tying the above together
//! - [`catalog`] — Session types and timezone choices
//! - [`config`] — Scheduling configuration and flow inputs
//! - [`temporal`] — Date parsing and formatting helpers
//! - [`error`] — Error types

pub mod catalog;
pub mod config;
pub mod error;
pub mod flow;
pub mod grouping;
pub mod navigator;
pub mod request;
pub mod selection;
pub mod slot;
pub mod temporal;
pub mod window;

pub use catalog::{Price, SessionTypeOption, TimezoneChoice, TimezoneOption};
pub use config::{BookingInputs, SchedulerConfig};
pub use error::{BookingError, SelectionError};
pub use flow::BookingFlow;
pub use grouping::{DayIndex, DayKey};
pub use navigator::{CalendarNavigator, DayView, VISIBLE_DAYS};
pub use request::{
    build_request, BookingRequest, BookingSink, MentorIdentity, MentorRef, RecordingSink,
};
pub use selection::SelectionState;
pub use slot::{
    normalize, normalize_all, AvailabilityInput, InstantInput, NormalizedSlot, SlotRecord,
};
pub use window::{is_selectable, BookingWindow, BookingWindowPolicy, DEFAULT_HORIZON_DAYS};
