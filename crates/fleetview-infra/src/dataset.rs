//! Fleet dataset loader
//!
//! Reads the processed vehicle CSV into raw rows. Row validation happens
//! later in the record store so malformed rows are reported, not fatal.

use std::fs;
use std::path::Path;

use fleetview_domain::model::{RawRecord, REQUIRED_COLUMNS};
use fleetview_types::DatasetError;
use tracing::debug;

use crate::decode_text;

/// Load raw fleet rows from a CSV file
///
/// Expected header (extra columns are ignored):
/// Vehicle Make,Vehicle Type,Vehicle Fuel Source,City,State,ZIP Code,Vehicle Model Year,Wheelchair Accessible,Status
pub fn load_raw_records<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>, DatasetError> {
    let bytes = fs::read(path.as_ref())?;
    let text = decode_text(&bytes);
    let rows = parse_raw_records(&text)?;
    debug!(path = %path.as_ref().display(), rows = rows.len(), "loaded fleet dataset");
    Ok(rows)
}

/// Parse raw fleet rows from CSV text
pub fn parse_raw_records(text: &str) -> Result<Vec<RawRecord>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    validate_headers(&headers)?;

    let mut rows = Vec::new();
    for result in reader.deserialize::<RawRecord>() {
        rows.push(result?);
    }
    Ok(rows)
}

fn validate_headers(headers: &csv::StringRecord) -> Result<(), DatasetError> {
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(DatasetError::MissingColumn(col.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Vehicle Make,Vehicle Type,Vehicle Fuel Source,City,State,ZIP Code,Vehicle Model Year,Wheelchair Accessible,Status";

    #[test]
    fn test_parse_rows_with_blanks() {
        let text = format!(
            "{HEADER}\n\
             Toyota,Sedan,Hybrid,Boston,MA,2134.0,2019,N,Active\n\
             Ford,Van,,Chicago,IL,,2015.0,Y,Active\n"
        );
        let rows = parse_raw_records(&text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].make.as_deref(), Some("Toyota"));
        assert_eq!(rows[0].zip_code.as_deref(), Some("2134.0"));
        assert_eq!(rows[1].fuel_source, None);
        assert_eq!(rows[1].zip_code, None);
        assert_eq!(rows[1].model_year.as_deref(), Some("2015.0"));
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let text = "Vehicle Make,Vehicle Type,Vehicle Fuel Source,City,State,Vehicle Model Year,Status,Notes\n\
                    Honda,SUV,Gasoline,Denver,CO,2020,Retired,spare\n";
        let rows = parse_raw_records(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].zip_code, None);
        assert_eq!(rows[0].wheelchair_accessible, None);
        assert_eq!(rows[0].status.as_deref(), Some("Retired"));
    }

    #[test]
    fn test_missing_required_column() {
        let text = "Vehicle Make,Vehicle Type,City,State,Vehicle Model Year,Status\nHonda,SUV,Denver,CO,2020,Active\n";
        let err = parse_raw_records(text).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(ref c) if c == "Vehicle Fuel Source"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "Tesla,Sedan,Electric,Austin,TX,78701,2022,N,Active").unwrap();
        let rows = load_raw_records(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].city.as_deref(), Some("Austin"));
    }
}
