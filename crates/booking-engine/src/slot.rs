//! Availability normalization.
//!
//! Mentors publish availability in two shapes: a bare start instant, or a
//! partially filled slot record. [`normalize`] turns either into a
//! [`NormalizedSlot`] with resolved instants, a deterministic id and a
//! display label. Entries that cannot be parsed are dropped, never raised:
//! one bad row in a published calendar must not hide the rest of it.

use chrono::{DateTime, SubsecRound, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::temporal::{format_time_of_day, from_epoch_millis, iso_millis, parse_instant};

/// A timestamp as it arrives from the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstantInput {
    /// Already resolved by the caller.
    At(DateTime<Utc>),
    /// Milliseconds since the Unix epoch.
    EpochMillis(i64),
    /// Text still to be parsed (see [`parse_instant`]).
    Text(String),
}

impl InstantInput {
    /// Resolve to a UTC instant, or `None` if the value cannot be parsed.
    ///
    /// Sub-millisecond digits are truncated so that the instant matches the
    /// millisecond rendering used in derived ids.
    pub fn resolve(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        let instant = match self {
            InstantInput::At(dt) => Some(*dt),
            InstantInput::EpochMillis(ms) => from_epoch_millis(*ms),
            InstantInput::Text(s) => parse_instant(s, tz).ok(),
        };
        instant.map(|dt| dt.trunc_subsecs(3))
    }
}

impl From<&str> for InstantInput {
    fn from(s: &str) -> Self {
        InstantInput::Text(s.to_string())
    }
}

impl From<DateTime<Utc>> for InstantInput {
    fn from(dt: DateTime<Utc>) -> Self {
        InstantInput::At(dt)
    }
}

/// A partially specified slot. Only `start` is required for the record to
/// produce a slot; it is optional here so that one record missing it does
/// not fail deserialization of the whole availability list.
///
/// Fields of the wrong JSON type are read leniently: a numeric `id` or
/// `label` becomes its text, and a `start` or `end` that is not a timestamp
/// shape is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotRecord {
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub start: Option<InstantInput>,
    #[serde(
        default,
        deserialize_with = "lenient_instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<InstantInput>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// One raw availability entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AvailabilityInput {
    /// A slot start with an implicit zero-length duration.
    Instant(InstantInput),
    /// A structured slot record.
    Slot(SlotRecord),
    /// Any other JSON value (`null`, booleans, fractional numbers, arrays).
    /// Kept so the rest of the list still deserializes; never yields a slot.
    Malformed(Value),
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_instant<'de, D>(deserializer: D) -> Result<Option<InstantInput>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(InstantInput::deserialize(value).ok())
}

impl From<&str> for AvailabilityInput {
    fn from(s: &str) -> Self {
        AvailabilityInput::Instant(InstantInput::from(s))
    }
}

impl From<SlotRecord> for AvailabilityInput {
    fn from(record: SlotRecord) -> Self {
        AvailabilityInput::Slot(record)
    }
}

/// A bookable slot in canonical form.
///
/// `end` is not forced to be after `start`; a reversed record is kept as
/// supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSlot {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl NormalizedSlot {
    /// Length of the slot in whole minutes (negative for reversed records).
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Normalize a single availability entry.
///
/// Returns `None` when the start instant is missing or unparseable. Labels
/// and derived ids are rendered for `tz`.
///
/// # Examples
///
/// ```
/// use booking_engine::slot::{normalize, AvailabilityInput};
///
/// let slot = normalize(&AvailabilityInput::from("2024-05-01T14:30:00Z"), &chrono_tz::UTC).unwrap();
/// assert_eq!(slot.id, "2024-05-01T14:30:00.000Z-2024-05-01T14:30:00.000Z");
/// assert_eq!(slot.label, "2:30 PM");
/// ```
pub fn normalize(input: &AvailabilityInput, tz: &Tz) -> Option<NormalizedSlot> {
    match input {
        AvailabilityInput::Instant(instant) => {
            let Some(start) = instant.resolve(tz) else {
                debug!(entry = ?instant, "dropping unparseable availability instant");
                return None;
            };
            Some(NormalizedSlot {
                id: derive_id(&start, &start),
                start,
                end: start,
                label: format_time_of_day(&start, tz),
                metadata: None,
            })
        }
        AvailabilityInput::Slot(record) => normalize_record(record, tz),
        AvailabilityInput::Malformed(value) => {
            debug!(entry = %value, "dropping availability entry of unsupported shape");
            None
        }
    }
}

fn normalize_record(record: &SlotRecord, tz: &Tz) -> Option<NormalizedSlot> {
    let Some(start) = record.start.as_ref().and_then(|s| s.resolve(tz)) else {
        debug!(id = ?record.id, start = ?record.start, "dropping slot record without a usable start");
        return None;
    };
    let end = record
        .end
        .as_ref()
        .and_then(|e| e.resolve(tz))
        .unwrap_or(start);

    let id = record.id.clone().unwrap_or_else(|| derive_id(&start, &end));
    let label = record.label.clone().unwrap_or_else(|| {
        format!(
            "{} - {}",
            format_time_of_day(&start, tz),
            format_time_of_day(&end, tz)
        )
    });

    Some(NormalizedSlot {
        id,
        start,
        end,
        label,
        metadata: record.metadata.clone(),
    })
}

/// Normalize a whole availability list, dropping entries that fail to parse.
pub fn normalize_all(inputs: &[AvailabilityInput], tz: &Tz) -> Vec<NormalizedSlot> {
    let slots: Vec<NormalizedSlot> = inputs.iter().filter_map(|i| normalize(i, tz)).collect();
    if slots.len() < inputs.len() {
        debug!(
            dropped = inputs.len() - slots.len(),
            kept = slots.len(),
            "normalized availability with dropped entries"
        );
    }
    slots
}

fn derive_id(start: &DateTime<Utc>, end: &DateTime<Utc>) -> String {
    format!("{}-{}", iso_millis(start), iso_millis(end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::UTC;
    use serde_json::json;

    fn record(start: &str, end: Option<&str>) -> AvailabilityInput {
        AvailabilityInput::Slot(SlotRecord {
            start: Some(start.into()),
            end: end.map(InstantInput::from),
            ..Default::default()
        })
    }

    #[test]
    fn test_bare_instant() {
        let slot = normalize(&"2024-05-01T14:30:00Z".into(), &UTC).unwrap();
        assert_eq!(slot.id, "2024-05-01T14:30:00.000Z-2024-05-01T14:30:00.000Z");
        assert_eq!(slot.start, slot.end);
        assert_eq!(slot.label, "2:30 PM");
        assert!(slot.metadata.is_none());
    }

    #[test]
    fn test_bare_instant_unparseable_is_dropped() {
        assert!(normalize(&"not-a-date".into(), &UTC).is_none());
    }

    #[test]
    fn test_epoch_millis_instant() {
        let input = AvailabilityInput::Instant(InstantInput::EpochMillis(1_717_405_200_000));
        let slot = normalize(&input, &UTC).unwrap();
        assert_eq!(slot.start, Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_record_derives_id_and_label() {
        let slot = normalize(
            &record("2024-06-03T09:00:00Z", Some("2024-06-03T10:00:00Z")),
            &UTC,
        )
        .unwrap();
        assert_eq!(slot.id, "2024-06-03T09:00:00.000Z-2024-06-03T10:00:00.000Z");
        assert_eq!(slot.label, "9:00 AM - 10:00 AM");
        assert_eq!(slot.duration_minutes(), 60);
    }

    #[test]
    fn test_record_end_defaults_to_start() {
        let slot = normalize(&record("2024-06-03T09:00:00Z", None), &UTC).unwrap();
        assert_eq!(slot.end, slot.start);
        assert_eq!(slot.label, "9:00 AM - 9:00 AM");
    }

    #[test]
    fn test_record_unparseable_end_defaults_to_start() {
        let slot = normalize(&record("2024-06-03T09:00:00Z", Some("later")), &UTC).unwrap();
        assert_eq!(slot.end, slot.start);
    }

    #[test]
    fn test_record_supplied_fields_are_verbatim() {
        let input = AvailabilityInput::Slot(SlotRecord {
            id: Some("slot-A".to_string()),
            start: Some("2024-06-03T09:00:00Z".into()),
            end: Some("2024-06-03T09:30:00Z".into()),
            label: Some("Morning chat".to_string()),
            metadata: Some(json!({ "room": "blue" })),
        });
        let slot = normalize(&input, &UTC).unwrap();
        assert_eq!(slot.id, "slot-A");
        assert_eq!(slot.label, "Morning chat");
        assert_eq!(slot.metadata, Some(json!({ "room": "blue" })));
    }

    #[test]
    fn test_record_missing_start_is_dropped() {
        let input = AvailabilityInput::Slot(SlotRecord {
            id: Some("orphan".to_string()),
            ..Default::default()
        });
        assert!(normalize(&input, &UTC).is_none());
    }

    #[test]
    fn test_reversed_record_passes_through() {
        let slot = normalize(
            &record("2024-06-03T10:00:00Z", Some("2024-06-03T09:00:00Z")),
            &UTC,
        )
        .unwrap();
        assert!(slot.end < slot.start);
        assert_eq!(slot.duration_minutes(), -60);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let input: AvailabilityInput = "2024-05-01T14:30:00Z".into();
        assert_eq!(normalize(&input, &UTC), normalize(&input, &UTC));
    }

    #[test]
    fn test_normalize_all_drops_malformed() {
        let inputs: Vec<AvailabilityInput> =
            vec!["not-a-date".into(), "2024-06-03T09:00:00Z".into()];
        let slots = normalize_all(&inputs, &UTC);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start, Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_deserialize_mixed_shapes() {
        let raw = json!([
            "2024-06-03T09:00:00Z",
            1_717_405_200_000_i64,
            { "start": "2024-06-03T11:00:00Z", "end": "2024-06-03T11:45:00Z" },
            { "label": "no start" },
            "garbage"
        ]);
        let inputs: Vec<AvailabilityInput> = serde_json::from_value(raw).unwrap();
        assert_eq!(inputs.len(), 5);
        assert!(matches!(inputs[0], AvailabilityInput::Instant(InstantInput::At(_))));
        assert!(matches!(
            inputs[1],
            AvailabilityInput::Instant(InstantInput::EpochMillis(_))
        ));
        assert!(matches!(inputs[2], AvailabilityInput::Slot(_)));
        assert!(matches!(
            inputs[4],
            AvailabilityInput::Instant(InstantInput::Text(_))
        ));

        let slots = normalize_all(&inputs, &UTC);
        assert_eq!(slots.len(), 3);
    }

    #[test]
    fn test_deserialize_tolerates_wrong_json_types() {
        let raw = json!([
            null,
            true,
            1.5,
            { "start": 12.5 },
            { "id": 7, "start": "2024-06-03T10:00:00Z", "end": false },
            "2024-06-03T09:00:00Z"
        ]);
        let inputs: Vec<AvailabilityInput> = serde_json::from_value(raw).unwrap();
        assert_eq!(inputs.len(), 6);
        assert_eq!(inputs[0], AvailabilityInput::Malformed(Value::Null));
        assert_eq!(inputs[1], AvailabilityInput::Malformed(json!(true)));
        assert_eq!(inputs[2], AvailabilityInput::Malformed(json!(1.5)));
        assert_eq!(inputs[3], AvailabilityInput::Slot(SlotRecord::default()));

        let slots = normalize_all(&inputs, &UTC);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].id, "7");
        assert_eq!(slots[0].end, slots[0].start);
        assert_eq!(slots[1].label, "9:00 AM");
    }

    #[test]
    fn test_sub_millisecond_digits_are_truncated() {
        let a = normalize(&"2024-06-03T09:00:00.123456Z".into(), &UTC).unwrap();
        let b = normalize(&"2024-06-03T09:00:00.123999Z".into(), &UTC).unwrap();
        assert_eq!(a.start, "2024-06-03T09:00:00.123Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(a, b);
        assert_eq!(a.id, "2024-06-03T09:00:00.123Z-2024-06-03T09:00:00.123Z");
    }
}
