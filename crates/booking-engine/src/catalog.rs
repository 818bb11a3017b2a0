//! Mentor-published catalog entries: session types and timezone choices.
//!
//! These are supplied by the caller and passed through untouched; the
//! engine never invents an offering.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::temporal::format_minutes;

/// Price as published. Numbers are amounts in the mentor's currency, text
/// is shown verbatim ("Pay what you want").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(f64),
    Text(String),
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Amount(a) if *a == 0.0 => write!(f, "Free"),
            Price::Amount(a) if a.fract() == 0.0 => write!(f, "${a:.0}"),
            Price::Amount(a) => write!(f, "${a:.2}"),
            Price::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One bookable offering, e.g. "Intro call".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTypeOption {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Length in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
}

impl SessionTypeOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        SessionTypeOption {
            id: id.into(),
            label: label.into(),
            description: None,
            duration: None,
            price: None,
        }
    }

    /// One-line summary such as `"Intro call · 30 min · $40"`.
    pub fn summary(&self) -> String {
        let mut parts = vec![self.label.clone()];
        if let Some(minutes) = self.duration {
            parts.push(format_minutes(minutes));
        }
        if let Some(price) = &self.price {
            parts.push(price.to_string());
        }
        parts.join(" · ")
    }
}

/// A selectable timezone, e.g. `{ value: "Europe/Berlin", label: "Berlin (CET)" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimezoneOption {
    pub value: String,
    pub label: String,
}

impl TimezoneOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        TimezoneOption {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The selected timezone: a catalog option or a bare identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimezoneChoice {
    Option(TimezoneOption),
    Raw(String),
}

impl TimezoneChoice {
    /// The timezone identifier.
    pub fn value(&self) -> &str {
        match self {
            TimezoneChoice::Option(opt) => &opt.value,
            TimezoneChoice::Raw(s) => s,
        }
    }

    /// Display text; a raw identifier is its own label.
    pub fn label(&self) -> &str {
        match self {
            TimezoneChoice::Option(opt) => &opt.label,
            TimezoneChoice::Raw(s) => s,
        }
    }

    /// The initial selection: the explicit default if any, else the first option.
    pub fn initial(
        default: Option<&TimezoneChoice>,
        options: &[TimezoneOption],
    ) -> Option<TimezoneChoice> {
        default
            .cloned()
            .or_else(|| options.first().cloned().map(TimezoneChoice::Option))
    }
}

impl From<TimezoneOption> for TimezoneChoice {
    fn from(opt: TimezoneOption) -> Self {
        TimezoneChoice::Option(opt)
    }
}

impl From<&str> for TimezoneChoice {
    fn from(s: &str) -> Self {
        TimezoneChoice::Raw(s.to_string())
    }
}
