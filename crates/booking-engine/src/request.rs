//! Booking request assembly and hand-off.
//!
//! [`build_request`] turns a complete [`SelectionState`] into an immutable
//! [`BookingRequest`]. Delivery belongs to a [`BookingSink`], the seam to
//! whatever transport schedules the session (typically
//! `POST /mentoring/sessions`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{SessionTypeOption, TimezoneChoice};
use crate::grouping::DayIndex;
use crate::selection::SelectionState;
use crate::slot::NormalizedSlot;

/// Anything that can stand in for the mentor being booked.
pub trait MentorIdentity {
    fn mentor_id(&self) -> &str;

    fn profile_id(&self) -> Option<&str> {
        None
    }
}

/// A plain mentor reference as it arrives in JSON inputs.
///
/// Fields beyond `id` and `profileId` are kept in `extra` and passed
/// through to the request untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl MentorRef {
    pub fn new(id: impl Into<String>) -> Self {
        MentorRef {
            id: id.into(),
            profile_id: None,
            extra: serde_json::Map::new(),
        }
    }
}

impl MentorIdentity for MentorRef {
    fn mentor_id(&self) -> &str {
        &self.id
    }

    fn profile_id(&self) -> Option<&str> {
        self.profile_id.as_deref()
    }
}

/// The finished booking payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest<M> {
    pub mentor_id: String,
    pub mentor_profile_id: Option<String>,
    pub mentor: M,
    pub slot: NormalizedSlot,
    pub session_type: SessionTypeOption,
    pub timezone: Option<TimezoneChoice>,
    pub notes: String,
}

/// Build the request, or `None` while the slot or session type is missing.
///
/// The slot is resolved through `index` by the selected day and slot id, so a
/// stale id never produces a request. Timezone and notes pass through as is.
pub fn build_request<M>(
    state: &SelectionState,
    index: &DayIndex,
    mentor: &M,
) -> Option<BookingRequest<M>>
where
    M: MentorIdentity + Clone,
{
    let slot = state.selected_slot(index)?;
    let session_type = state.selected_session_type()?;
    Some(BookingRequest {
        mentor_id: mentor.mentor_id().to_string(),
        mentor_profile_id: mentor.profile_id().map(str::to_string),
        mentor: mentor.clone(),
        slot: slot.clone(),
        session_type: session_type.clone(),
        timezone: state.selected_timezone().cloned(),
        notes: state.notes().to_string(),
    })
}

/// Receives finished booking requests.
pub trait BookingSink<M> {
    type Error: std::fmt::Display;

    fn submit(&mut self, request: BookingRequest<M>) -> Result<(), Self::Error>;
}

/// Sink that keeps every request in memory.
#[derive(Debug)]
pub struct RecordingSink<M> {
    pub requests: Vec<BookingRequest<M>>,
}

impl<M> Default for RecordingSink<M> {
    fn default() -> Self {
        RecordingSink {
            requests: Vec::new(),
        }
    }
}

impl<M> BookingSink<M> for RecordingSink<M> {
    type Error = std::convert::Infallible;

    fn submit(&mut self, request: BookingRequest<M>) -> Result<(), Self::Error> {
        self.requests.push(request);
        Ok(())
    }
}
