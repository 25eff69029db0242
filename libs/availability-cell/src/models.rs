use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default window the portal proposes when a slot is added for a day.
pub const DEFAULT_START: &str = "09:00";
pub const DEFAULT_END: &str = "17:00";
pub const DEFAULT_CLINIC_ADDRESS: &str = "Main Clinic";

/// Weekday of a recurring slot. Parsing accepts any casing; equality on the
/// enum is what makes all day comparisons case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayOfWeek::ALL
            .iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Invalid day of week: {}", s))
    }
}

impl Serialize for DayOfWeek {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DayOfWeek {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityType {
    Clinic,
    Online,
}

/// Coarse classification of a slot by its start hour. Always derived from
/// `start_time`, never set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotType {
    Morning,
    Afternoon,
    Evening,
}

impl SlotType {
    pub fn from_start(start: NaiveTime) -> Self {
        let hour = start.hour();
        if hour < 12 {
            SlotType::Morning
        } else if hour < 17 {
            SlotType::Afternoon
        } else {
            SlotType::Evening
        }
    }
}

/// Parse a wall-clock time from the wire, accepting `HH:MM` or `HH:MM:SS`
/// and truncating seconds. Empty or malformed values become `None`.
pub fn parse_hhmm(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
        .map(|t| t.with_second(0).unwrap_or(t))
}

pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub(crate) mod time_format {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{format_hhmm, parse_hhmm};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_str(&format_hhmm(*time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_hhmm))
    }
}

/// A recurring weekly availability window for one doctor.
///
/// `id` is assigned by the remote store; a slot without one only exists
/// locally and has not been saved yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub doctor_id: Uuid,
    pub day_of_week: DayOfWeek,
    #[serde(with = "time_format", default)]
    pub start_time: Option<NaiveTime>,
    #[serde(with = "time_format", default)]
    pub end_time: Option<NaiveTime>,
    pub is_active: bool,
    pub availability_type: AvailabilityType,
    #[serde(default)]
    pub address: String,
    pub slot_type: SlotType,
}

impl Slot {
    pub fn from_request(doctor_id: Uuid, request: &CreateSlotRequest) -> Self {
        let start = request.start_time.or_else(|| parse_hhmm(DEFAULT_START));
        let end = request.end_time.or_else(|| parse_hhmm(DEFAULT_END));

        let address = match request.availability_type {
            AvailabilityType::Online => String::new(),
            AvailabilityType::Clinic if request.address.trim().is_empty() => {
                DEFAULT_CLINIC_ADDRESS.to_string()
            }
            AvailabilityType::Clinic => request.address.clone(),
        };

        Self {
            id: None,
            doctor_id,
            day_of_week: request.day_of_week,
            start_time: start,
            end_time: end,
            is_active: request.is_active,
            availability_type: request.availability_type,
            address,
            slot_type: start.map(SlotType::from_start).unwrap_or(SlotType::Morning),
        }
    }

    /// Recompute `slot_type` from the current start time.
    pub fn refresh_slot_type(&mut self) {
        if let Some(start) = self.start_time {
            self.slot_type = SlotType::from_start(start);
        }
    }
}

/// Identity of a slot in the local set: pending slots are keyed by a local
/// counter, persisted slots by their remote id. One equality, no reference
/// tricks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKey {
    Pending(u64),
    Persisted(Uuid),
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlotRequest {
    pub day_of_week: DayOfWeek,
    #[serde(with = "time_format", default)]
    pub start_time: Option<NaiveTime>,
    #[serde(with = "time_format", default)]
    pub end_time: Option<NaiveTime>,
    pub availability_type: AvailabilityType,
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl CreateSlotRequest {
    /// Draft request with the portal's default window for a day.
    pub fn for_day(day: DayOfWeek, availability_type: AvailabilityType) -> Self {
        Self {
            day_of_week: day,
            start_time: parse_hhmm(DEFAULT_START),
            end_time: parse_hhmm(DEFAULT_END),
            availability_type,
            address: String::new(),
            is_active: true,
        }
    }
}

/// Patch for one slot. `slot_type` on the wire is informational only; the
/// manager always rederives it from `start_time`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSlotRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<DayOfWeek>,
    #[serde(with = "time_format", default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(with = "time_format", default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_type: Option<AvailabilityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_type: Option<SlotType>,
}

impl UpdateSlotRequest {
    /// Full-field patch, as pushed for every edited persisted slot on save.
    pub fn from_slot(slot: &Slot) -> Self {
        Self {
            day_of_week: Some(slot.day_of_week),
            start_time: slot.start_time,
            end_time: slot.end_time,
            is_active: Some(slot.is_active),
            availability_type: Some(slot.availability_type),
            address: Some(slot.address.clone()),
            slot_type: Some(slot.slot_type),
        }
    }
}

/// Body of the save endpoint: brand-new slots plus edited persisted ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveScheduleRequest {
    #[serde(default)]
    pub new_slots: Vec<CreateSlotRequest>,
    #[serde(default)]
    pub edited_slots: Vec<Slot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleDayRequest {
    pub day_of_week: DayOfWeek,
    pub active: bool,
}

/// Per-day rollup used for the weekday toggles in the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub active: bool,
    pub has_slots: bool,
}
