//! Index-based view over a record slice

use super::vehicle::VehicleRecord;

/// Subset of records addressed by index into the owning slice.
///
/// Views never copy record content, so repeated queries cost one index
/// vector each.
#[derive(Debug, Clone)]
pub struct RecordView<'a> {
    records: &'a [VehicleRecord],
    indices: Vec<usize>,
}

impl<'a> RecordView<'a> {
    /// View covering every record in order
    pub fn all(records: &'a [VehicleRecord]) -> Self {
        Self {
            records,
            indices: (0..records.len()).collect(),
        }
    }

    /// Indices must be in range for `records`; out-of-range ones are dropped.
    pub fn from_indices(records: &'a [VehicleRecord], indices: Vec<usize>) -> Self {
        let indices = indices
            .into_iter()
            .filter(|&i| i < records.len())
            .collect();
        Self { records, indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Backing record slice (unfiltered)
    pub fn source(&self) -> &'a [VehicleRecord] {
        self.records
    }

    /// Records in view order paired with their index in the source slice
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a VehicleRecord)> + '_ {
        let records = self.records;
        self.indices.iter().map(move |&i| (i, &records[i]))
    }

    pub fn records(&self) -> impl Iterator<Item = &'a VehicleRecord> + '_ {
        self.iter().map(|(_, record)| record)
    }

    /// Narrow the view with a predicate, keeping order
    pub fn retain<F>(&self, mut keep: F) -> RecordView<'a>
    where
        F: FnMut(&VehicleRecord) -> bool,
    {
        let indices = self
            .iter()
            .filter(|(_, record)| keep(*record))
            .map(|(i, _)| i)
            .collect();
        RecordView {
            records: self.records,
            indices,
        }
    }

    /// Records eligible for geographic views
    pub fn with_coordinates(&self) -> RecordView<'a> {
        self.retain(|record| record.coordinates.is_some())
    }
}
