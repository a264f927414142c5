//! Raw dataset row as it arrives from the processed fleet CSV

use serde::Deserialize;

/// Unvalidated dataset row. Every column is optional here; the record
/// store decides which absences make the row malformed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Vehicle Make", default)]
    pub make: Option<String>,
    #[serde(rename = "Vehicle Type", default)]
    pub vehicle_type: Option<String>,
    #[serde(rename = "Vehicle Fuel Source", default)]
    pub fuel_source: Option<String>,
    #[serde(rename = "City", default)]
    pub city: Option<String>,
    #[serde(rename = "State", default)]
    pub state: Option<String>,
    #[serde(rename = "ZIP Code", default)]
    pub zip_code: Option<String>,
    #[serde(rename = "Vehicle Model Year", default)]
    pub model_year: Option<String>,
    #[serde(rename = "Wheelchair Accessible", default)]
    pub wheelchair_accessible: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
}

/// Columns the loader insists on; `ZIP Code` and `Wheelchair Accessible` may be missing.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Vehicle Make",
    "Vehicle Type",
    "Vehicle Fuel Source",
    "City",
    "State",
    "Vehicle Model Year",
    "Status",
];
