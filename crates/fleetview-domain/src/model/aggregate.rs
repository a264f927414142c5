//! Aggregate result types

use std::fmt;

use serde::{Serialize, Serializer};

/// One value of a grouping key.
///
/// Ordering is numeric for years and lexical for text, so chronological
/// output falls out of sorting by key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupValue {
    Year(i32),
    Flag(bool),
    Text(String),
}

impl GroupValue {
    pub fn text(value: impl Into<String>) -> Self {
        GroupValue::Text(value.into())
    }
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupValue::Year(year) => write!(f, "{}", year),
            GroupValue::Flag(true) => f.write_str("Yes"),
            GroupValue::Flag(false) => f.write_str("No"),
            GroupValue::Text(text) => f.write_str(text),
        }
    }
}

impl Serialize for GroupValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GroupValue::Year(year) => serializer.serialize_i32(*year),
            other => serializer.collect_str(other),
        }
    }
}

/// Grouping key tuple plus the number of records sharing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateRow {
    pub key: Vec<GroupValue>,
    pub count: usize,
}

impl AggregateRow {
    pub fn new(key: Vec<GroupValue>, count: usize) -> Self {
        Self { key, count }
    }
}

/// Grouped counts for a single time bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub time_value: GroupValue,
    pub rows: Vec<AggregateRow>,
}

impl Frame {
    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }
}

/// Geocoded records collapsed onto their ZIP location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoCount {
    pub zip_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_value_ordering() {
        assert!(GroupValue::Year(1999) < GroupValue::Year(2010));
        assert!(GroupValue::text("Ford") < GroupValue::text("Honda"));
    }

    #[test]
    fn test_group_value_serializes_flat() {
        let row = AggregateRow::new(
            vec![GroupValue::Year(2015), GroupValue::Flag(true), GroupValue::text("Hybrid")],
            3,
        );
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"key":[2015,"Yes","Hybrid"],"count":3}"#);
    }
}
