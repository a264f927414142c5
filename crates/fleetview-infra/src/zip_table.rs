//! ZIP gazetteer backed coordinate source

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use fleetview_domain::model::Coordinates;
use fleetview_domain::repository::CoordinateSource;
use fleetview_store::normalize_zip;
use fleetview_types::{DatasetError, GeocodeError};
use serde::Deserialize;
use tracing::debug;

use crate::decode_text;

const ZIP_HEADERS: [&str; 4] = ["zip", "zip_code", "zipcode", "postal_code"];
const LATITUDE_HEADERS: [&str; 2] = ["latitude", "lat"];
const LONGITUDE_HEADERS: [&str; 3] = ["longitude", "lon", "lng"];

#[derive(Debug, Deserialize)]
struct ZipRow {
    #[serde(alias = "zip_code", alias = "zipcode", alias = "postal_code")]
    zip: String,
    #[serde(alias = "lat", deserialize_with = "csv::invalid_option")]
    latitude: Option<f64>,
    #[serde(alias = "lon", alias = "lng", deserialize_with = "csv::invalid_option")]
    longitude: Option<f64>,
}

/// In-memory ZIP → coordinates table loaded from a gazetteer CSV
///
/// Expected header: `zip,latitude,longitude` (aliases `zip_code`,
/// `postal_code`, `lat`, `lon`, `lng`). Keys are normalized like dataset
/// ZIPs; for duplicate keys the first row wins.
#[derive(Debug, Clone, Default)]
pub struct ZipTable {
    entries: HashMap<String, Coordinates>,
}

impl ZipTable {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let bytes = fs::read(path.as_ref())?;
        let table = Self::parse(&decode_text(&bytes))?;
        debug!(path = %path.as_ref().display(), entries = table.len(), "loaded ZIP table");
        Ok(table)
    }

    pub fn parse(text: &str) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        // serde aliases are case-sensitive; normalize header case first
        let lowered: csv::StringRecord = headers.iter().map(|h| h.to_lowercase()).collect();
        require_any(&lowered, &ZIP_HEADERS)?;
        require_any(&lowered, &LATITUDE_HEADERS)?;
        require_any(&lowered, &LONGITUDE_HEADERS)?;
        reader.set_headers(lowered);

        let mut table = Self::default();
        let mut skipped = 0usize;
        for result in reader.deserialize::<ZipRow>() {
            let row = result?;
            match (normalize_zip(&row.zip), row.latitude, row.longitude) {
                (Some(zip), Some(lat), Some(lon)) => {
                    table.entries.entry(zip).or_insert(Coordinates::new(lat, lon));
                }
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(skipped, "skipped unusable ZIP table rows");
        }
        Ok(table)
    }

    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Coordinates)>,
        K: AsRef<str>,
    {
        let mut table = Self::default();
        for (zip, coords) in entries {
            if let Some(zip) = normalize_zip(zip.as_ref()) {
                table.entries.entry(zip).or_insert(coords);
            }
        }
        table
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CoordinateSource for ZipTable {
    fn lookup(&self, zip: &str) -> Result<Option<Coordinates>, GeocodeError> {
        Ok(self.entries.get(zip).copied())
    }
}

fn require_any(headers: &csv::StringRecord, names: &[&str]) -> Result<(), DatasetError> {
    if headers.iter().any(|h| names.contains(&h)) {
        Ok(())
    } else {
        Err(DatasetError::MissingColumn(names[0].to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_with_aliases_and_case() {
        let text = "ZIP,Lat,Lng\n2134,42.35,-71.13\n60601,41.88,-87.62\n";
        let table = ZipTable::parse(text).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.lookup("02134").unwrap(),
            Some(Coordinates::new(42.35, -71.13))
        );
        assert_eq!(table.lookup("99999").unwrap(), None);
    }

    #[test]
    fn test_unusable_rows_skipped_first_duplicate_wins() {
        let text = "zip,latitude,longitude\n\
                    60601,41.88,-87.62\n\
                    60601,0.0,0.0\n\
                    unknown,1.0,1.0\n\
                    73301,n/a,-97.74\n";
        let table = ZipTable::parse(text).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.lookup("60601").unwrap(),
            Some(Coordinates::new(41.88, -87.62))
        );
    }

    #[test]
    fn test_missing_longitude_column() {
        let err = ZipTable::parse("zip,latitude\n60601,41.88\n").unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(ref c) if c == "longitude"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "postal_code,latitude,longitude").unwrap();
        writeln!(file, "78701,30.27,-97.74").unwrap();
        let table = ZipTable::load(file.path()).unwrap();
        assert!(table.lookup("78701").unwrap().is_some());
    }

    #[test]
    fn test_from_entries_normalizes_keys() {
        let table = ZipTable::from_entries([("2134.0", Coordinates::new(42.35, -71.13))]);
        assert!(table.lookup("02134").unwrap().is_some());
    }
}
