//! Grouped counts over one or more dimensions

use std::collections::BTreeMap;

use crate::model::{AggregateRow, Dimension, GeoCount, GroupValue, RecordView};

use super::category_collapser::CollapsedCategories;

/// Count records per distinct key tuple across `dimensions`.
///
/// Rows come back in ascending key order. Counts sum to `view.len()` and
/// are never zero. With no dimensions the whole view is one group.
pub fn group_count(view: &RecordView<'_>, dimensions: &[Dimension]) -> Vec<AggregateRow> {
    group_count_with(view, dimensions, &[])
}

/// Like [`group_count`], but a dimension with an entry in `collapsed`
/// groups by the collapsed display category instead of the raw value.
pub fn group_count_with(
    view: &RecordView<'_>,
    dimensions: &[Dimension],
    collapsed: &[&CollapsedCategories],
) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<Vec<GroupValue>, usize> = BTreeMap::new();

    for (index, record) in view.iter() {
        let key = dimensions
            .iter()
            .map(|&dimension| {
                collapsed
                    .iter()
                    .find(|c| c.dimension() == dimension)
                    .and_then(|c| c.label(index).cloned())
                    .unwrap_or_else(|| record.value(dimension))
            })
            .collect();
        *groups.entry(key).or_default() += 1;
    }

    groups
        .into_iter()
        .map(|(key, count)| AggregateRow::new(key, count))
        .collect()
}

/// Largest groups first, ties broken by key
pub fn sort_by_count_desc(rows: &mut [AggregateRow]) {
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
}

/// Per-ZIP counts of records carrying coordinates; ungeocoded records are skipped.
pub fn geo_counts(view: &RecordView<'_>) -> Vec<GeoCount> {
    let mut locations: BTreeMap<&str, GeoCount> = BTreeMap::new();

    for record in view.with_coordinates().records() {
        let (Some(zip), Some(coords)) = (record.zip_code.as_deref(), record.coordinates) else {
            continue;
        };
        locations
            .entry(zip)
            .or_insert_with(|| GeoCount {
                zip_code: zip.to_string(),
                latitude: coords.latitude,
                longitude: coords.longitude,
                count: 0,
            })
            .count += 1;
    }

    locations.into_values().collect()
}
