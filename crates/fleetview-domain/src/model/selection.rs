//! Filter selections supplied per query

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use fleetview_types::QueryError;
use serde::Serialize;

use super::vehicle::{canonical_name, Dimension, VehicleRecord};

/// Fields a user can filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterField {
    Make,
    Type,
    FuelSource,
    City,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Make,
        FilterField::Type,
        FilterField::FuelSource,
        FilterField::City,
    ];

    pub fn dimension(&self) -> Dimension {
        match self {
            FilterField::Make => Dimension::Make,
            FilterField::Type => Dimension::Type,
            FilterField::FuelSource => Dimension::FuelSource,
            FilterField::City => Dimension::City,
        }
    }

    pub fn value_of<'r>(&self, record: &'r VehicleRecord) -> &'r str {
        match self {
            FilterField::Make => &record.make,
            FilterField::Type => &record.vehicle_type,
            FilterField::FuelSource => &record.fuel_source,
            FilterField::City => &record.city,
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dimension().name())
    }
}

impl FromStr for FilterField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = canonical_name(s);
        FilterField::ALL
            .into_iter()
            .find(|field| canonical_name(field.dimension().name()) == wanted)
            .ok_or_else(|| QueryError::InvalidFilterField(s.to_string()))
    }
}

/// Accepted values per field. A field that is absent or mapped to an
/// empty set places no restriction on the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    fields: BTreeMap<FilterField, BTreeSet<String>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`FilterSelection::insert`]
    pub fn with<I, V>(mut self, field: FilterField, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.insert(field, values);
        self
    }

    /// Add accepted values for a field, merging with any already present
    pub fn insert<I, V>(&mut self, field: FilterField, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.fields
            .entry(field)
            .or_default()
            .extend(values.into_iter().map(Into::into));
    }

    /// Build a selection from field names, rejecting any name that is not
    /// a filterable field.
    pub fn from_named<I, K, V, S>(pairs: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        for (name, values) in pairs {
            let field: FilterField = name.as_ref().parse()?;
            selection.insert(field, values);
        }
        Ok(selection)
    }

    pub fn values(&self, field: FilterField) -> Option<&BTreeSet<String>> {
        self.fields.get(&field)
    }

    /// Fields with at least one accepted value
    pub fn active(&self) -> impl Iterator<Item = (FilterField, &BTreeSet<String>)> {
        self.fields
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(field, values)| (*field, values))
    }

    pub fn is_unrestricted(&self) -> bool {
        self.active().next().is_none()
    }

    pub fn matches(&self, record: &VehicleRecord) -> bool {
        self.active()
            .all(|(field, values)| values.contains(field.value_of(record)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_named_accepts_aliases() {
        let selection = FilterSelection::from_named([
            ("make", vec!["Toyota"]),
            ("fuelSource", vec!["Electric", "Hybrid"]),
        ])
        .unwrap();
        assert_eq!(selection.values(FilterField::Make).map(|v| v.len()), Some(1));
        assert_eq!(
            selection.values(FilterField::FuelSource).map(|v| v.len()),
            Some(2)
        );
    }

    #[test]
    fn test_from_named_rejects_unknown_field() {
        let err = FilterSelection::from_named([("color", vec!["Red"])]).unwrap_err();
        assert_eq!(err, QueryError::InvalidFilterField("color".to_string()));
    }

    #[test]
    fn test_state_is_not_filterable() {
        assert!("state".parse::<FilterField>().is_err());
    }

    #[test]
    fn test_empty_sets_are_unrestricted() {
        let selection = FilterSelection::new()
            .with(FilterField::Make, Vec::<String>::new())
            .with(FilterField::City, Vec::<String>::new());
        assert!(selection.is_unrestricted());
    }

    #[test]
    fn test_insert_merges_values() {
        let mut selection = FilterSelection::new();
        selection.insert(FilterField::City, ["Boston"]);
        selection.insert(FilterField::City, ["Chicago", "Boston"]);
        assert_eq!(selection.values(FilterField::City).map(|v| v.len()), Some(2));
    }
}
