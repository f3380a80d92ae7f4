//! Temporal profiles.
//!
//! Three fixed-shape containers: a working-day/holiday pair, a seven-day
//! week, and a 24-hour profile for each day type. Profiles carry one
//! reference for the whole profile rather than one per value.

use std::collections::BTreeMap;

use core::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use suews_state::{IndexDescriptor, StateRow};
use suews_types::{DayType, Reference};

use crate::ConfigError;

/// Number of hours in an hourly profile.
pub const HOURS: usize = 24;

// ---------------------------------------------------------------------------
// Day profile
// ---------------------------------------------------------------------------

/// A value for working days and one for holidays.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DayProfile {
    /// Working-day value, index 0.
    pub working_day: f64,
    /// Holiday value, index 1.
    pub holiday: f64,
    /// Provenance of the profile.
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
}

impl DayProfile {
    /// Build a profile without provenance.
    pub const fn new(working_day: f64, holiday: f64) -> Self {
        Self {
            working_day,
            holiday,
            reference: None,
        }
    }

    /// Value for one day type.
    pub const fn get(&self, day: DayType) -> f64 {
        match day {
            DayType::WorkingDay => self.working_day,
            DayType::Holiday => self.holiday,
        }
    }

    /// Write `(name, "(d,)")` for both day types.
    pub fn to_state(&self, name: &str) -> StateRow {
        let mut row = StateRow::new();
        for day in DayType::ALL {
            row.push(name, IndexDescriptor::day(day), self.get(day));
        }
        row
    }

    /// Read the profile written by [`DayProfile::to_state`].
    pub fn from_state(row: &StateRow, name: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(
            row.read(name, IndexDescriptor::day(DayType::WorkingDay))?,
            row.read(name, IndexDescriptor::day(DayType::Holiday))?,
        ))
    }
}

impl Default for DayProfile {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl PartialEq for DayProfile {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        self.working_day == other.working_day && self.holiday == other.holiday
    }
}

// ---------------------------------------------------------------------------
// Weekly profile
// ---------------------------------------------------------------------------

/// One value per weekday, Monday first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyProfile {
    /// Index 0.
    pub monday: f64,
    /// Index 1.
    pub tuesday: f64,
    /// Index 2.
    pub wednesday: f64,
    /// Index 3.
    pub thursday: f64,
    /// Index 4.
    pub friday: f64,
    /// Index 5.
    pub saturday: f64,
    /// Index 6.
    pub sunday: f64,
    /// Provenance of the profile.
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
}

impl WeeklyProfile {
    /// Build a profile from seven values, Monday first.
    pub const fn from_days(days: [f64; 7]) -> Self {
        let [monday, tuesday, wednesday, thursday, friday, saturday, sunday] = days;
        Self {
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
            sunday,
            reference: None,
        }
    }

    /// The seven values, Monday first.
    pub const fn days(&self) -> [f64; 7] {
        [
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
            self.sunday,
        ]
    }

    /// Write `(name, "(i,)")` for i in 0..7.
    pub fn to_state(&self, name: &str) -> StateRow {
        let mut row = StateRow::new();
        row.push_all(name, &self.days(), IndexDescriptor::weekday);
        row
    }

    /// Read the profile written by [`WeeklyProfile::to_state`].
    pub fn from_state(row: &StateRow, name: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_days(
            row.read_array(name, IndexDescriptor::weekday)?,
        ))
    }
}

impl PartialEq for WeeklyProfile {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        self.days() == other.days()
    }
}

// ---------------------------------------------------------------------------
// Hourly profile
// ---------------------------------------------------------------------------

/// Values for hours 1 to 24 of working days and holidays.
///
/// Always complete: the only ways to build one are [`HourlyProfile::new`],
/// which checks the hour keys, [`HourlyProfile::uniform`], and decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "HourlyProfileDoc", into = "HourlyProfileDoc")]
pub struct HourlyProfile {
    working_day: [f64; HOURS],
    holiday: [f64; HOURS],
    /// Provenance of the profile.
    pub reference: Option<Reference>,
}

impl HourlyProfile {
    /// Build a profile from hour-to-value maps keyed 1 to 24.
    ///
    /// # Errors
    ///
    /// [`ConfigError::IncompleteProfile`] if a key is outside 1..=24 or an
    /// hour is missing.
    pub fn new(
        working_day: &BTreeMap<u8, f64>,
        holiday: &BTreeMap<u8, f64>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            working_day: complete_hours(DayType::WorkingDay, labelled_entries(working_day))?,
            holiday: complete_hours(DayType::Holiday, labelled_entries(holiday))?,
            reference: None,
        })
    }

    /// The same value for every hour of both day types.
    pub const fn constant(value: f64) -> Self {
        Self {
            working_day: [value; HOURS],
            holiday: [value; HOURS],
            reference: None,
        }
    }

    /// Uniform 1/24 distribution for both day types.
    pub const fn uniform() -> Self {
        Self::constant(1.0 / 24.0)
    }

    /// The 24 values of one day type, hour 1 first.
    pub const fn values(&self, day: DayType) -> &[f64; HOURS] {
        match day {
            DayType::WorkingDay => &self.working_day,
            DayType::Holiday => &self.holiday,
        }
    }

    /// Value at an hour label 1..=24.
    pub fn get(&self, hour: u8, day: DayType) -> Option<f64> {
        let slot = usize::from(hour).checked_sub(1)?;
        self.values(day).get(slot).copied()
    }

    /// Write 48 cells at `(name, "(h-1, d)")`.
    pub fn to_state(&self, name: &str) -> StateRow {
        let mut row = StateRow::new();
        for day in DayType::ALL {
            row.push_all(name, self.values(day), |hour| IndexDescriptor::hour(hour, day));
        }
        row
    }

    /// Read the 48 cells written by [`HourlyProfile::to_state`].
    pub fn from_state(row: &StateRow, name: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            working_day: row.read_array(name, |hour| {
                IndexDescriptor::hour(hour, DayType::WorkingDay)
            })?,
            holiday: row.read_array(name, |hour| IndexDescriptor::hour(hour, DayType::Holiday))?,
            reference: None,
        })
    }
}

impl Default for HourlyProfile {
    fn default() -> Self {
        Self::uniform()
    }
}

impl PartialEq for HourlyProfile {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        self.working_day == other.working_day && self.holiday == other.holiday
    }
}

fn labelled_entries(map: &BTreeMap<u8, f64>) -> impl Iterator<Item = (i64, f64)> + '_ {
    map.iter().map(|(hour, value)| (i64::from(*hour), *value))
}

/// Place `(hour, value)` pairs into a 24-slot array, rejecting anything but
/// exactly the hours 1 to 24, each given once.
fn complete_hours(
    day: DayType,
    entries: impl Iterator<Item = (i64, f64)>,
) -> Result<[f64; HOURS], ConfigError> {
    let mut out = [0.0; HOURS];
    let mut seen = [false; HOURS];
    for (hour, value) in entries {
        let slot = usize::try_from(hour)
            .ok()
            .and_then(|h| h.checked_sub(1))
            .filter(|slot| *slot < HOURS)
            .ok_or(ConfigError::IncompleteProfile {
                day,
                reason: "hour values must be between 1 and 24",
            })?;
        if let (Some(target), Some(flag)) = (out.get_mut(slot), seen.get_mut(slot)) {
            if *flag {
                return Err(ConfigError::IncompleteProfile {
                    day,
                    reason: "each hour must be given once",
                });
            }
            *target = value;
            *flag = true;
        }
    }
    if seen.iter().all(|flag| *flag) {
        Ok(out)
    } else {
        Err(ConfigError::IncompleteProfile {
            day,
            reason: "must have all hours from 1 to 24",
        })
    }
}

// ---------------------------------------------------------------------------
// Document form
// ---------------------------------------------------------------------------

/// Hour label in a document; accepts `1` and `"1"` alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct HourKey(i64);

impl Serialize for HourKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for HourKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HourVisitor;

        impl Visitor<'_> for HourVisitor {
            type Value = HourKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an hour label between 1 and 24")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<HourKey, E> {
                Ok(HourKey(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<HourKey, E> {
                i64::try_from(v)
                    .map(HourKey)
                    .map_err(|e| E::custom(format!("hour label {v}: {e}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<HourKey, E> {
                v.trim()
                    .parse()
                    .map(HourKey)
                    .map_err(|e| E::custom(format!("hour label {v:?}: {e}")))
            }
        }

        deserializer.deserialize_any(HourVisitor)
    }
}

/// Hour entries of one day type in document order. Kept as a list so that
/// `1` and `"1"` in the same map stay two entries.
struct HourEntries(Vec<(HourKey, f64)>);

impl Serialize for HourEntries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(hour, value)| (hour, value)))
    }
}

impl<'de> Deserialize<'de> for HourEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = HourEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from hour label to value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<HourEntries, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(HOURS));
                while let Some(entry) = map.next_entry::<HourKey, f64>()? {
                    entries.push(entry);
                }
                Ok(HourEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Serialized shape of an [`HourlyProfile`].
#[derive(Serialize, Deserialize)]
struct HourlyProfileDoc {
    working_day: HourEntries,
    holiday: HourEntries,
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    reference: Option<Reference>,
}

impl TryFrom<HourlyProfileDoc> for HourlyProfile {
    type Error = ConfigError;

    fn try_from(doc: HourlyProfileDoc) -> Result<Self, Self::Error> {
        let entries = |hours: HourEntries| hours.0.into_iter().map(|(k, v)| (k.0, v));
        Ok(Self {
            working_day: complete_hours(DayType::WorkingDay, entries(doc.working_day))?,
            holiday: complete_hours(DayType::Holiday, entries(doc.holiday))?,
            reference: doc.reference,
        })
    }
}

impl From<HourlyProfile> for HourlyProfileDoc {
    fn from(profile: HourlyProfile) -> Self {
        let labelled = |values: [f64; HOURS]| {
            HourEntries(
                (1_i64..)
                    .zip(values)
                    .map(|(hour, value)| (HourKey(hour), value))
                    .collect(),
            )
        };
        Self {
            working_day: labelled(profile.working_day),
            holiday: labelled(profile.holiday),
            reference: profile.reference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours(range: core::ops::RangeInclusive<u8>, value: f64) -> BTreeMap<u8, f64> {
        range.map(|h| (h, value)).collect()
    }

    #[test]
    fn day_profile_columns() {
        let row = DayProfile::new(0.7, 0.3).to_state("qf_a");
        assert_eq!(row.len(), 2);
        assert_eq!(row.read::<f64>("qf_a", IndexDescriptor::Single(0)).ok(), Some(0.7));
        assert_eq!(row.read::<f64>("qf_a", IndexDescriptor::Single(1)).ok(), Some(0.3));
        assert_eq!(
            DayProfile::from_state(&row, "qf_a").ok(),
            Some(DayProfile::new(0.7, 0.3))
        );
    }

    #[test]
    fn weekly_profile_is_monday_first() {
        let week = WeeklyProfile::from_days([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let row = week.to_state("daywat");
        assert_eq!(row.len(), 7);
        assert_eq!(row.read::<f64>("daywat", IndexDescriptor::Single(6)).ok(), Some(7.0));
        assert_eq!(WeeklyProfile::from_state(&row, "daywat").ok(), Some(week));
    }

    #[test]
    fn missing_hour_is_rejected() {
        let err = HourlyProfile::new(&hours(1..=23, 0.1), &hours(1..=24, 0.1)).err();
        let message = err.map(|e| e.to_string()).unwrap_or_default();
        assert!(message.contains("must have all hours from 1 to 24"), "{message}");
        assert!(message.contains("working_day"), "{message}");
    }

    #[test]
    fn out_of_range_hour_is_rejected() {
        let mut holiday = hours(1..=24, 0.1);
        holiday.insert(25, 0.1);
        let err = HourlyProfile::new(&hours(1..=24, 0.1), &holiday).err();
        let message = err.map(|e| e.to_string()).unwrap_or_default();
        assert!(message.contains("hour values must be between 1 and 24"), "{message}");
    }

    #[test]
    fn complete_profile_encodes_48_columns() {
        let profile = HourlyProfile::new(&hours(1..=24, 0.5), &hours(1..=24, 0.25));
        assert!(profile.is_ok());
        let row = profile.map(|p| p.to_state("ahprof_24hr")).unwrap_or_default();
        assert_eq!(row.len(), 48);
        assert_eq!(
            row.read::<f64>("ahprof_24hr", IndexDescriptor::Pair(23, 1)).ok(),
            Some(0.25)
        );
    }

    #[test]
    fn hour_label_maps_to_zero_based_index() {
        let mut working = hours(1..=24, 0.0);
        working.insert(1, 9.0);
        let profile = HourlyProfile::new(&working, &hours(1..=24, 0.0)).unwrap_or_default();
        let row = profile.to_state("popprof_24hr");
        assert_eq!(
            row.read::<f64>("popprof_24hr", IndexDescriptor::Pair(0, 0)).ok(),
            Some(9.0)
        );
        assert_eq!(profile.get(1, DayType::WorkingDay), Some(9.0));
        assert_eq!(profile.get(0, DayType::WorkingDay), None);
    }

    #[test]
    fn decode_restores_encoded_values() {
        let profile =
            HourlyProfile::new(&hours(1..=24, 0.3), &hours(1..=24, 0.6)).unwrap_or_default();
        let row = profile.to_state("traffprof_24hr");
        assert_eq!(HourlyProfile::from_state(&row, "traffprof_24hr").ok(), Some(profile));
    }

    #[test]
    fn document_accepts_integer_and_string_keys() {
        let mut doc = String::from("{\"working_day\": {");
        let body: Vec<String> = (1..=24).map(|h| format!("\"{h}\": 0.5")).collect();
        doc.push_str(&body.join(", "));
        doc.push_str("}, \"holiday\": {");
        doc.push_str(&body.join(", "));
        doc.push_str("}}");
        let parsed: Result<HourlyProfile, _> = serde_json::from_str(&doc);
        assert_eq!(parsed.ok(), Some(HourlyProfile::constant(0.5)));

        let yaml: Result<HourlyProfile, _> = serde_yml::from_str(
            &serde_yml::to_string(&HourlyProfile::uniform()).unwrap_or_default(),
        );
        assert_eq!(yaml.ok(), Some(HourlyProfile::uniform()));
    }

    #[test]
    fn repeated_hour_label_is_rejected() {
        let body: Vec<String> = (1..=24).map(|h| format!("\"{h}\": 0.04")).collect();
        let day = format!("{{{}, \"1\": 0.5}}", body.join(", "));
        let full = format!("{{{}}}", body.join(", "));
        let doc = format!("{{\"working_day\": {day}, \"holiday\": {full}}}");
        let parsed: Result<HourlyProfile, _> = serde_json::from_str(&doc);
        let err = parsed.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("each hour must be given once"), "{err}");
    }

    #[test]
    fn document_with_gap_is_rejected() {
        let parsed: Result<HourlyProfile, _> =
            serde_json::from_str(r#"{"working_day": {"1": 1.0}, "holiday": {"1": 1.0}}"#);
        assert!(parsed.is_err());
    }
}
