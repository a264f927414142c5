use crate::model::{Coordinates, VehicleRecord};

pub(crate) fn record(make: &str, fuel: &str, year: i32) -> VehicleRecord {
    VehicleRecord {
        make: make.to_string(),
        vehicle_type: "Sedan".to_string(),
        fuel_source: fuel.to_string(),
        city: "Boston".to_string(),
        state: "MA".to_string(),
        zip_code: None,
        model_year: year,
        wheelchair_accessible: false,
        status: "Active".to_string(),
        coordinates: None,
    }
}

pub(crate) fn geocoded(make: &str, zip: &str, lat: f64, lon: f64) -> VehicleRecord {
    VehicleRecord {
        zip_code: Some(zip.to_string()),
        coordinates: Some(Coordinates::new(lat, lon)),
        ..record(make, "Gasoline", 2018)
    }
}

/// 5 Toyota, 3 Honda, 2 Ford
pub(crate) fn ten_makes() -> Vec<VehicleRecord> {
    let mut records = Vec::new();
    for _ in 0..5 {
        records.push(record("Toyota", "Hybrid", 2019));
    }
    for _ in 0..3 {
        records.push(record("Honda", "Gasoline", 2020));
    }
    for _ in 0..2 {
        records.push(record("Ford", "Electric", 2021));
    }
    records
}
