//! Day-bucketed slot index.
//!
//! [`DayIndex`] partitions normalized slots by the local calendar day of
//! their start. It is rebuilt from the full availability snapshot every
//! time; there is no incremental update.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::BookingError;
use crate::slot::NormalizedSlot;
use crate::temporal::local_date;

/// A local calendar day, rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        DayKey(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        DayKey(date)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(DayKey)
            .map_err(|e| BookingError::InvalidDayKey(format!("'{}': {}", s, e)))
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Slots grouped by local day, each bucket ascending by start.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayIndex {
    buckets: BTreeMap<DayKey, Vec<NormalizedSlot>>,
}

impl DayIndex {
    /// Group `slots` by the day their start falls on in `tz`.
    ///
    /// Sorting is stable, so slots with equal starts keep their input order.
    pub fn build(slots: impl IntoIterator<Item = NormalizedSlot>, tz: &Tz) -> Self {
        let mut buckets: BTreeMap<DayKey, Vec<NormalizedSlot>> = BTreeMap::new();
        for slot in slots {
            let key = DayKey(local_date(&slot.start, tz));
            buckets.entry(key).or_default().push(slot);
        }
        for bucket in buckets.values_mut() {
            bucket.sort_by_key(|s| s.start);
        }
        DayIndex { buckets }
    }

    /// Slots on `day`, empty when the day has none.
    pub fn bucket(&self, day: &DayKey) -> &[NormalizedSlot] {
        self.buckets.get(day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn slot_count(&self, day: &DayKey) -> usize {
        self.bucket(day).len()
    }

    pub fn has_slots(&self, day: &DayKey) -> bool {
        self.slot_count(day) > 0
    }

    /// Look up a slot by id within one day's bucket.
    pub fn find_slot(&self, day: &DayKey, slot_id: &str) -> Option<&NormalizedSlot> {
        self.bucket(day).iter().find(|s| s.id == slot_id)
    }

    /// Find the day holding `slot_id`, searching days in ascending order.
    pub fn locate(&self, slot_id: &str) -> Option<(DayKey, &NormalizedSlot)> {
        self.buckets.iter().find_map(|(day, bucket)| {
            bucket.iter().find(|s| s.id == slot_id).map(|s| (*day, s))
        })
    }

    /// Days that have at least one slot, ascending.
    pub fn days(&self) -> impl Iterator<Item = DayKey> + '_ {
        self.buckets.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DayKey, &[NormalizedSlot])> + '_ {
        self.buckets.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn total_slots(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::{normalize_all, AvailabilityInput};
    use chrono_tz::America::New_York;
    use chrono_tz::UTC;

    fn key(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    fn index(raw: &[&str], tz: &Tz) -> DayIndex {
        let inputs: Vec<AvailabilityInput> = raw.iter().map(|s| (*s).into()).collect();
        DayIndex::build(normalize_all(&inputs, tz), tz)
    }

    #[test]
    fn test_day_key_round_trip_text() {
        let k = key("2024-05-10");
        assert_eq!(k.to_string(), "2024-05-10");
        assert_eq!(k.date(), NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
    }

    #[test]
    fn test_day_key_rejects_bad_text() {
        let err = "2024-13-01".parse::<DayKey>().unwrap_err().to_string();
        assert!(err.contains("Invalid day key"), "got: {err}");
    }

    #[test]
    fn test_day_key_serde_as_string() {
        let k = key("2024-06-03");
        assert_eq!(serde_json::to_string(&k).unwrap(), "\"2024-06-03\"");
        let back: DayKey = serde_json::from_str("\"2024-06-03\"").unwrap();
        assert_eq!(back, k);
    }

    #[test]
    fn test_empty_input_gives_empty_index() {
        let idx = DayIndex::build(Vec::new(), &UTC);
        assert!(idx.is_empty());
        assert_eq!(idx.total_slots(), 0);
        assert!(idx.bucket(&key("2024-06-03")).is_empty());
    }

    #[test]
    fn test_buckets_sorted_by_start() {
        let idx = index(
            &[
                "2024-06-03T15:00:00Z",
                "2024-06-04T08:00:00Z",
                "2024-06-03T09:00:00Z",
            ],
            &UTC,
        );
        let day = idx.bucket(&key("2024-06-03"));
        assert_eq!(day.len(), 2);
        assert!(day[0].start < day[1].start);
        assert_eq!(idx.slot_count(&key("2024-06-04")), 1);
        assert_eq!(
            idx.days().map(|d| d.to_string()).collect::<Vec<_>>(),
            vec!["2024-06-03", "2024-06-04"]
        );
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let slots = vec![
            NormalizedSlot {
                id: "first".into(),
                start: "2024-06-03T09:00:00Z".parse().unwrap(),
                end: "2024-06-03T09:00:00Z".parse().unwrap(),
                label: "a".into(),
                metadata: None,
            },
            NormalizedSlot {
                id: "second".into(),
                start: "2024-06-03T09:00:00Z".parse().unwrap(),
                end: "2024-06-03T09:00:00Z".parse().unwrap(),
                label: "b".into(),
                metadata: None,
            },
        ];
        let idx = DayIndex::build(slots, &UTC);
        let ids: Vec<_> = idx
            .bucket(&key("2024-06-03"))
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_day_key_uses_display_zone() {
        // 02:00 UTC on June 3 is the evening of June 2 in New York
        let idx = index(&["2024-06-03T02:00:00Z"], &New_York);
        assert!(idx.has_slots(&key("2024-06-02")));
        assert!(!idx.has_slots(&key("2024-06-03")));
    }

    #[test]
    fn test_find_and_locate() {
        let idx = index(&["2024-06-03T09:00:00Z", "2024-06-05T09:00:00Z"], &UTC);
        let id = "2024-06-05T09:00:00.000Z-2024-06-05T09:00:00.000Z";
        assert!(idx.find_slot(&key("2024-06-05"), id).is_some());
        assert!(idx.find_slot(&key("2024-06-03"), id).is_none());
        let (day, slot) = idx.locate(id).unwrap();
        assert_eq!(day, key("2024-06-05"));
        assert_eq!(slot.id, id);
        assert!(idx.locate("missing").is_none());
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let raw = ["2024-06-03T09:00:00Z", "2024-06-03T10:00:00Z", "bad"];
        assert_eq!(index(&raw, &UTC), index(&raw, &UTC));
    }
}
