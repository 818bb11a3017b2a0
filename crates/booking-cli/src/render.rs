//! Plain-text rendering for terminal output.

use std::fmt::Write;

use booking_engine::{BookingFlow, MentorIdentity, NormalizedSlot, SessionTypeOption};
use chrono_tz::Tz;

/// The visible week, one line per day.
pub fn week<M: MentorIdentity + Clone>(flow: &BookingFlow<M>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", flow.navigator().week_label());
    for view in flow.visible_week() {
        let count = match view.slot_count {
            0 => "-".to_string(),
            1 => "1 slot".to_string(),
            n => format!("{n} slots"),
        };
        let mut notes = Vec::new();
        if view.is_today {
            notes.push("today");
        }
        if view.has_slots && !view.in_window {
            notes.push("outside booking window");
        }
        let line = format!(
            "{} {}  {:<8} {}",
            view.day.date().format("%a"),
            view.day,
            count,
            notes.join(", ")
        );
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

/// One line per slot: local time span, label and id.
pub fn slots(slots: &[NormalizedSlot], tz: Tz) -> String {
    let mut out = String::new();
    for slot in slots {
        let _ = writeln!(
            out,
            "{} - {}  {}  [{}]",
            slot.start.with_timezone(&tz).format("%H:%M"),
            slot.end.with_timezone(&tz).format("%H:%M"),
            slot.label,
            slot.id
        );
    }
    out
}

/// The mentor's session types, one summary line each. Empty when none are offered.
pub fn session_types(options: &[SessionTypeOption]) -> String {
    if options.is_empty() {
        return String::new();
    }
    let mut out = String::from("\nSession types:\n");
    for option in options {
        let _ = writeln!(out, "  {}  [{}]", option.summary(), option.id);
    }
    out
}
