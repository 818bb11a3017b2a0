//! Error types for booking-engine operations.

use thiserror::Error;

use crate::grouping::DayKey;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid day key: {0}")]
    InvalidDayKey(String),

    #[error("Selection rejected: {0}")]
    Selection(#[from] SelectionError),

    #[error("Booking incomplete: a slot and a session type are required")]
    Incomplete,

    #[error("Booking sink failed: {0}")]
    Sink(String),
}

/// Why a selection transition was refused.
///
/// A refused transition never mutates the selection state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("day {0} has no available slots")]
    DayHasNoSlots(DayKey),

    #[error("day {0} is outside the booking window")]
    OutsideBookingWindow(DayKey),

    #[error("no day is selected")]
    NoDaySelected,

    #[error("slot '{slot_id}' is not available on {day}")]
    SlotNotInDay { slot_id: String, day: DayKey },

    #[error("unknown slot '{0}'")]
    UnknownSlot(String),

    #[error("unknown session type '{0}'")]
    UnknownSessionType(String),
}

pub type Result<T> = std::result::Result<T, BookingError>;
