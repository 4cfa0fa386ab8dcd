use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Opaque facility identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityId(pub String);

impl FacilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FacilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pitch formats offered by facilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "Fútbol 5")]
    Futbol5,
    #[serde(rename = "Fútbol 7")]
    Futbol7,
    #[serde(rename = "Fútbol 11")]
    Futbol11,
}

impl FieldType {
    /// Display label, exactly as shown to players.
    pub fn label(&self) -> &'static str {
        match self {
            FieldType::Futbol5 => "Fútbol 5",
            FieldType::Futbol7 => "Fútbol 7",
            FieldType::Futbol11 => "Fútbol 11",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FieldType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fútbol 5" => Ok(FieldType::Futbol5),
            "Fútbol 7" => Ok(FieldType::Futbol7),
            "Fútbol 11" => Ok(FieldType::Futbol11),
            other => Err(CoreError::InvalidFieldType(other.to_string())),
        }
    }
}

/// Bookable venue. Reference data, never mutated by the booking core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    pub location: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Hourly price, whole currency units
    pub price: i64,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
}

impl Facility {
    pub fn has_amenity(&self, amenity: &str) -> bool {
        self.amenities.contains(amenity)
    }
}
