use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Slot identifier, unique within a catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub String);

impl SlotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bookable start time on one facility and date.
///
/// `available` only ever goes from `true` to `false`, when a booking claims
/// the slot through a [`crate::SlotRepository`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: SlotId,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub available: bool,
}

impl TimeSlot {
    pub fn new(id: impl Into<String>, time: NaiveTime, available: bool) -> Self {
        Self {
            id: SlotId::new(id),
            time,
            available,
        }
    }

    /// Parse an `HH:MM` slot time.
    pub fn parse_time(value: &str) -> CoreResult<NaiveTime> {
        NaiveTime::parse_from_str(value, hhmm::FORMAT)
            .map_err(|_| CoreError::InvalidSlotTime(value.to_string()))
    }

    pub fn time_label(&self) -> String {
        self.time.format(hhmm::FORMAT).to_string()
    }
}

/// Serde adapter for `HH:MM` times
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
