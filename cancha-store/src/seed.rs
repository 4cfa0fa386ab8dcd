use std::path::Path;

use cancha_core::{Facility, FacilityId, FieldType, TimeSlot};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Slots of one facility on one date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedListing {
    pub facility_id: FacilityId,
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
}

/// Contents of a seed file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedData {
    pub facilities: Vec<Facility>,
    #[serde(default)]
    pub listings: Vec<SeedListing>,
}

pub fn load_seed(path: impl AsRef<Path>) -> Result<SeedData, StoreError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Date the fixed demo listings are generated for in tests
pub fn demo_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap_or_default()
}

pub fn demo_facilities() -> Vec<Facility> {
    vec![
        facility("palermo-5", "Cancha Palermo", "Palermo, Buenos Aires", FieldType::Futbol5, 8000, &["parking", "lights"]),
        facility("cordoba-7", "Complejo Córdoba", "Córdoba", FieldType::Futbol7, 12000, &["parking", "lights", "locker_room"]),
        facility("rosario-11", "Estadio Rosario", "Rosario, Santa Fe", FieldType::Futbol11, 18000, &["parking", "lights", "locker_room", "cafeteria"]),
        facility("belgrano-5", "Belgrano Fútbol", "Belgrano, Buenos Aires", FieldType::Futbol5, 9000, &["lights"]),
        facility("mendoza-7", "Mendoza Sport", "Mendoza", FieldType::Futbol7, 15000, &["parking", "locker_room"]),
    ]
}

/// Evening slots (18:00 to 23:00) for every demo facility on `date`.
///
/// Slot ids are `{facility}-{yyyymmdd}-{hhmm}` so listings for different
/// dates never collide. The first slot of each facility starts out taken.
pub fn demo_slots(date: NaiveDate) -> Vec<SeedListing> {
    demo_facilities()
        .into_iter()
        .map(|facility| {
            let slots = (18..=23)
                .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0).map(|time| (hour, time)))
                .map(|(hour, time)| {
                    let id = format!(
                        "{}-{}-{}",
                        facility.id,
                        date.format("%Y%m%d"),
                        time.format("%H%M")
                    );
                    TimeSlot::new(id, time, hour != 18)
                })
                .collect();

            SeedListing {
                facility_id: facility.id,
                date,
                slots,
            }
        })
        .collect()
}

fn facility(
    id: &str,
    name: &str,
    location: &str,
    field_type: FieldType,
    price: i64,
    amenities: &[&str],
) -> Facility {
    Facility {
        id: FacilityId::new(id),
        name: name.to_string(),
        location: location.to_string(),
        field_type,
        price,
        amenities: amenities.iter().map(|a| a.to_string()).collect(),
    }
}
