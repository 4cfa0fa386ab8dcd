use std::collections::BTreeSet;

use cancha_core::Facility;
use serde::{Deserialize, Serialize};

/// Price bracket a player can narrow the listing to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceRange {
    Low,
    Medium,
    High,
}

impl PriceRange {
    /// Read a query parameter. Empty or unrecognised values mean "any price".
    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "low" => Some(PriceRange::Low),
            "medium" => Some(PriceRange::Medium),
            "high" => Some(PriceRange::High),
            _ => None,
        }
    }
}

/// Thresholds separating the price brackets.
///
/// `low` is strictly below `low_below`, `high` strictly above `high_above`,
/// and `medium` is the closed interval between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBrackets {
    pub low_below: i64,
    pub high_above: i64,
}

impl Default for PriceBrackets {
    fn default() -> Self {
        Self {
            low_below: 9000,
            high_above: 15000,
        }
    }
}

impl PriceBrackets {
    pub fn contains(&self, range: PriceRange, price: i64) -> bool {
        match range {
            PriceRange::Low => price < self.low_below,
            PriceRange::Medium => price >= self.low_below && price <= self.high_above,
            PriceRange::High => price > self.high_above,
        }
    }
}

/// What a player is searching for. Default criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub field_type: String,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_field_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = field_type.into();
        self
    }

    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    pub fn with_amenity(mut self, amenity: impl Into<String>) -> Self {
        self.amenities.insert(amenity.into());
        self
    }
}

/// Narrows a facility listing. Every active criterion must hold.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    brackets: PriceBrackets,
}

impl FilterEngine {
    pub fn new(brackets: PriceBrackets) -> Self {
        Self { brackets }
    }

    pub fn brackets(&self) -> PriceBrackets {
        self.brackets
    }

    /// Matching facilities in their original order. No match is an empty
    /// result, never an error.
    pub fn filter<'a>(
        &self,
        facilities: &'a [Facility],
        criteria: &FilterCriteria,
    ) -> Vec<&'a Facility> {
        facilities
            .iter()
            .filter(|facility| self.matches(facility, criteria))
            .collect()
    }

    pub fn matches(&self, facility: &Facility, criteria: &FilterCriteria) -> bool {
        if !criteria.location.is_empty()
            && !facility
                .location
                .to_lowercase()
                .contains(&criteria.location.to_lowercase())
        {
            return false;
        }

        if !criteria.field_type.is_empty()
            && normalize_field_type(facility.field_type.label())
                != normalize_field_type(&criteria.field_type)
        {
            return false;
        }

        if let Some(range) = criteria.price_range {
            if !self.brackets.contains(range, facility.price) {
                return false;
            }
        }

        criteria
            .amenities
            .iter()
            .all(|amenity| facility.has_amenity(amenity))
    }
}

/// Lower-case and drop whitespace. Accents are kept, so "Fútbol 5" and
/// "futbol5" stay distinct.
pub fn normalize_field_type(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
