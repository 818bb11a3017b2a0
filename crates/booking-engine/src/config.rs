//! Scheduling configuration and flow inputs.
//!
//! A single JSON document configures a booking flow:
//!
//! ```json
//! {
//!   "availability": ["2024-06-03T09:00:00Z"],
//!   "sessionTypes": [{ "id": "intro", "label": "Intro call" }],
//!   "timezoneOptions": [{ "value": "UTC", "label": "UTC" }],
//!   "defaultTimezone": "UTC",
//!   "schedulingWindowDays": 21,
//!   "displayTimezone": "Europe/Berlin",
//!   "mentor": { "id": "m-1" }
//! }
//! ```
//!
//! Everything except `mentor` has a default. The current instant is never
//! part of the configuration; callers inject it.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::catalog::{SessionTypeOption, TimezoneChoice, TimezoneOption};
use crate::error::BookingError;
use crate::slot::AvailabilityInput;
use crate::temporal::parse_timezone;
use crate::window::{BookingWindowPolicy, DEFAULT_HORIZON_DAYS};

fn default_window_days() -> Option<u32> {
    Some(DEFAULT_HORIZON_DAYS)
}

fn default_display_timezone() -> String {
    "UTC".to_string()
}

/// Engine-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// Booking horizon in days. `null` or `0` leaves the window open-ended.
    #[serde(default = "default_window_days")]
    pub scheduling_window_days: Option<u32>,
    /// IANA zone used to bucket slots into days and render labels.
    #[serde(default = "default_display_timezone")]
    pub display_timezone: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            scheduling_window_days: default_window_days(),
            display_timezone: default_display_timezone(),
        }
    }
}

impl SchedulerConfig {
    /// The display timezone, validated.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidTimezone`] for an unknown IANA name.
    pub fn timezone(&self) -> Result<Tz, BookingError> {
        parse_timezone(&self.display_timezone)
    }

    pub fn policy(&self) -> BookingWindowPolicy {
        BookingWindowPolicy::new(self.scheduling_window_days)
    }
}

/// Everything a booking flow consumes, apart from the current instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInputs<M> {
    #[serde(default)]
    pub availability: Vec<AvailabilityInput>,
    #[serde(default)]
    pub session_types: Vec<SessionTypeOption>,
    #[serde(default)]
    pub timezone_options: Vec<TimezoneOption>,
    #[serde(default)]
    pub default_timezone: Option<TimezoneChoice>,
    #[serde(flatten)]
    pub config: SchedulerConfig,
    pub mentor: M,
}

impl<M> BookingInputs<M> {
    /// Inputs with default configuration and empty catalogs.
    pub fn new(mentor: M, availability: Vec<AvailabilityInput>) -> Self {
        BookingInputs {
            availability,
            session_types: Vec::new(),
            timezone_options: Vec::new(),
            default_timezone: None,
            config: SchedulerConfig::default(),
            mentor,
        }
    }
}
