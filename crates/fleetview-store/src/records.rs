//! Validated, geocoded record set for one session

use std::collections::HashSet;

use fleetview_domain::model::{Dimension, RawRecord, RecordView, VehicleRecord};
use fleetview_domain::repository::CoordinateSource;
use serde::Serialize;
use tracing::{debug, info};

use crate::geocode::{normalize_zip, GeocodeResolver};

/// A raw row refused at ingest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    /// 1-based position among the raw records
    pub row: usize,
    pub reasons: Vec<String>,
}

/// Ingest outcome handed back with the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RejectionReport {
    pub total_rows: usize,
    pub accepted: usize,
    pub rejected: Vec<RejectedRow>,
}

impl RejectionReport {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Immutable record set. Built once, then only read.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<VehicleRecord>,
}

impl RecordStore {
    /// Validate and geocode `raw` in input order.
    ///
    /// Rows missing a required field are rejected and listed in the report.
    /// Rows whose ZIP does not resolve are kept with no coordinates.
    pub fn build<S: CoordinateSource>(
        raw: Vec<RawRecord>,
        resolver: &GeocodeResolver<S>,
    ) -> (Self, RejectionReport) {
        let total_rows = raw.len();
        let mut records = Vec::with_capacity(total_rows);
        let mut rejected = Vec::new();

        for (idx, row) in raw.into_iter().enumerate() {
            match validate(row) {
                Ok(mut record) => {
                    record.coordinates = record
                        .zip_code
                        .as_deref()
                        .and_then(|zip| resolver.resolve_normalized(zip));
                    records.push(record);
                }
                Err(reasons) => {
                    debug!(row = idx + 1, reasons = ?reasons, "rejected malformed row");
                    rejected.push(RejectedRow {
                        row: idx + 1,
                        reasons,
                    });
                }
            }
        }

        let store = Self { records };
        info!(
            total = total_rows,
            accepted = store.len(),
            rejected = rejected.len(),
            geocoded = store.geocoded_count(),
            "record store built"
        );

        let report = RejectionReport {
            total_rows,
            accepted: store.len(),
            rejected,
        };
        (store, report)
    }

    /// All records in input order
    pub fn all(&self) -> &[VehicleRecord] {
        &self.records
    }

    pub fn view(&self) -> RecordView<'_> {
        RecordView::all(&self.records)
    }

    pub fn get(&self, index: usize) -> Option<&VehicleRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records eligible for geographic views
    pub fn geocoded_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.coordinates.is_some())
            .count()
    }

    /// Distinct values of a dimension in order of first appearance
    pub fn distinct_values(&self, dimension: Dimension) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.value(dimension).to_string())
            .filter(|value| seen.insert(value.clone()))
            .collect()
    }
}

fn validate(row: RawRecord) -> Result<VehicleRecord, Vec<String>> {
    let mut reasons = Vec::new();

    let make = required(row.make, Dimension::Make, &mut reasons);
    let vehicle_type = required(row.vehicle_type, Dimension::Type, &mut reasons);
    let fuel_source = required(row.fuel_source, Dimension::FuelSource, &mut reasons);
    let city = required(row.city, Dimension::City, &mut reasons);
    let state = required(row.state, Dimension::State, &mut reasons);
    let status = required(row.status, Dimension::Status, &mut reasons);
    let model_year = required(row.model_year, Dimension::ModelYear, &mut reasons).and_then(|raw| {
        let year = parse_model_year(&raw);
        if year.is_none() {
            reasons.push(format!("invalid {}: {}", Dimension::ModelYear.column(), raw));
        }
        year
    });

    match (make, vehicle_type, fuel_source, city, state, status, model_year) {
        (
            Some(make),
            Some(vehicle_type),
            Some(fuel_source),
            Some(city),
            Some(state),
            Some(status),
            Some(model_year),
        ) if reasons.is_empty() => Ok(VehicleRecord {
            make,
            vehicle_type,
            fuel_source,
            city,
            state,
            zip_code: row.zip_code.as_deref().and_then(normalize_zip),
            model_year,
            wheelchair_accessible: row
                .wheelchair_accessible
                .as_deref()
                .map(parse_flag)
                .unwrap_or(false),
            status,
            coordinates: None,
        }),
        _ => Err(reasons),
    }
}

fn required(value: Option<String>, dimension: Dimension, reasons: &mut Vec<String>) -> Option<String> {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(v) => Some(v),
        None => {
            reasons.push(format!("missing {}", dimension.column()));
            None
        }
    }
}

/// Accepts `2015` and the float-formatted `2015.0`
fn parse_model_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if let Ok(year) = s.parse::<i32>() {
        return Some(year);
    }
    let value: f64 = s.parse().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}

fn parse_flag(s: &str) -> bool {
    let s = s.trim().to_lowercase();
    matches!(s.as_str(), "y" | "yes" | "true" | "1")
}
