//! Vehicle record and the dimensions it can be grouped by

use std::fmt;
use std::str::FromStr;

use fleetview_types::QueryError;
use serde::{Deserialize, Serialize};

use super::aggregate::GroupValue;

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components finite and inside the WGS84 ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// One fleet vehicle after validation and geocoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub make: String,
    pub vehicle_type: String,
    pub fuel_source: String,
    pub city: String,
    pub state: String,
    /// Normalized 5-digit ZIP, `None` when the raw value was absent or invalid
    pub zip_code: Option<String>,
    pub model_year: i32,
    pub wheelchair_accessible: bool,
    /// Operational/requirement status
    pub status: String,
    /// Derived from `zip_code`; never authoritative input
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl VehicleRecord {
    pub fn latitude(&self) -> Option<f64> {
        self.coordinates.map(|c| c.latitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.coordinates.map(|c| c.longitude)
    }

    /// Display label for the accessibility flag
    pub fn wheelchair_label(&self) -> &'static str {
        if self.wheelchair_accessible {
            "Yes"
        } else {
            "No"
        }
    }

    /// Value of this record along a grouping dimension
    pub fn value(&self, dimension: Dimension) -> GroupValue {
        match dimension {
            Dimension::Make => GroupValue::Text(self.make.clone()),
            Dimension::Type => GroupValue::Text(self.vehicle_type.clone()),
            Dimension::FuelSource => GroupValue::Text(self.fuel_source.clone()),
            Dimension::City => GroupValue::Text(self.city.clone()),
            Dimension::State => GroupValue::Text(self.state.clone()),
            Dimension::ZipCode => {
                GroupValue::Text(self.zip_code.clone().unwrap_or_default())
            }
            Dimension::ModelYear => GroupValue::Year(self.model_year),
            Dimension::WheelchairAccessible => GroupValue::Flag(self.wheelchair_accessible),
            Dimension::Status => GroupValue::Text(self.status.clone()),
        }
    }
}

/// Record fields usable as grouping dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dimension {
    Make,
    Type,
    FuelSource,
    City,
    State,
    ZipCode,
    ModelYear,
    WheelchairAccessible,
    Status,
}

impl Dimension {
    pub const ALL: [Dimension; 9] = [
        Dimension::Make,
        Dimension::Type,
        Dimension::FuelSource,
        Dimension::City,
        Dimension::State,
        Dimension::ZipCode,
        Dimension::ModelYear,
        Dimension::WheelchairAccessible,
        Dimension::Status,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Make => "make",
            Dimension::Type => "type",
            Dimension::FuelSource => "fuel-source",
            Dimension::City => "city",
            Dimension::State => "state",
            Dimension::ZipCode => "zip-code",
            Dimension::ModelYear => "model-year",
            Dimension::WheelchairAccessible => "wheelchair-accessible",
            Dimension::Status => "status",
        }
    }

    /// Column header used in the source dataset
    pub fn column(&self) -> &'static str {
        match self {
            Dimension::Make => "Vehicle Make",
            Dimension::Type => "Vehicle Type",
            Dimension::FuelSource => "Vehicle Fuel Source",
            Dimension::City => "City",
            Dimension::State => "State",
            Dimension::ZipCode => "ZIP Code",
            Dimension::ModelYear => "Vehicle Model Year",
            Dimension::WheelchairAccessible => "Wheelchair Accessible",
            Dimension::Status => "Status",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dimension {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = canonical_name(s);
        Dimension::ALL
            .into_iter()
            .find(|d| canonical_name(d.name()) == wanted)
            .ok_or_else(|| QueryError::InvalidDimension(s.to_string()))
    }
}

/// Lowercase with separators removed, so `fuelSource`, `fuel_source`
/// and `fuel-source` compare equal.
pub(crate) fn canonical_name(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_parse_aliases() {
        assert_eq!("fuelSource".parse::<Dimension>(), Ok(Dimension::FuelSource));
        assert_eq!("fuel_source".parse::<Dimension>(), Ok(Dimension::FuelSource));
        assert_eq!("Model-Year".parse::<Dimension>(), Ok(Dimension::ModelYear));
        assert_eq!(
            "color".parse::<Dimension>(),
            Err(QueryError::InvalidDimension("color".to_string()))
        );
    }

    #[test]
    fn test_coordinates_validity() {
        assert!(Coordinates::new(42.36, -71.06).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, f64::NAN).is_valid());
    }
}
