//! Error types for fleetview

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Errors raised while reading a dataset or coordinate table from disk
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// Failures of the external coordinate source.
///
/// These never abort an ingest: the resolver records the ZIP as a miss.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocodeError {
    #[error("Coordinate source unavailable: {0}")]
    Unavailable(String),

    #[error("Coordinates out of range for {zip}: ({latitude}, {longitude})")]
    OutOfRange {
        zip: String,
        latitude: f64,
        longitude: f64,
    },
}

/// A rejected query. No partial result accompanies these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Unknown filter field: {0}")]
    InvalidFilterField(String),

    #[error("Unknown view: {0}")]
    InvalidView(String),

    #[error("Unknown dimension: {0}")]
    InvalidDimension(String),

    #[error("Collapse threshold must be within [0, 1], got {0}")]
    InvalidThreshold(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Geocode error: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("Query rejected: {0}")]
    Query(#[from] QueryError),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_converts_into_error() {
        let err: Error = QueryError::InvalidFilterField("color".to_string()).into();
        assert!(matches!(err, Error::Query(QueryError::InvalidFilterField(_))));
        assert_eq!(err.to_string(), "Query rejected: Unknown filter field: color");
    }

    #[test]
    fn test_missing_column_message() {
        let err = DatasetError::MissingColumn("City".to_string());
        assert_eq!(err.to_string(), "Missing required column: City");
    }
}
