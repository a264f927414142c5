//! Long-tail category collapsing

use std::collections::{BTreeSet, HashMap};

use crate::model::{Dimension, GroupValue, RecordView};

/// Catch-all label for infrequent values
pub const OTHER_CATEGORY: &str = "Other";

/// Values at or below this share of the view are folded into [`OTHER_CATEGORY`]
pub const DEFAULT_COLLAPSE_THRESHOLD: f64 = 0.02;

/// Display category per record for one dimension
#[derive(Debug, Clone, PartialEq)]
pub struct CollapsedCategories {
    dimension: Dimension,
    labels: HashMap<usize, GroupValue>,
    kept: BTreeSet<GroupValue>,
}

impl CollapsedCategories {
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Display category for the record at `index` in the source slice
    pub fn label(&self, index: usize) -> Option<&GroupValue> {
        self.labels.get(&index)
    }

    /// Values that cleared the threshold
    pub fn kept(&self) -> &BTreeSet<GroupValue> {
        &self.kept
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Map each record in `view` to its value along `dimension`, or to
/// `"Other"` when that value's count does not exceed
/// `threshold * view.len()`.
///
/// Recomputed from scratch per view; nothing carries over between queries.
pub fn collapse(view: &RecordView<'_>, dimension: Dimension, threshold: f64) -> CollapsedCategories {
    let mut counts: HashMap<GroupValue, usize> = HashMap::new();
    for record in view.records() {
        *counts.entry(record.value(dimension)).or_default() += 1;
    }

    let limit = threshold * view.len() as f64;
    let kept: BTreeSet<GroupValue> = counts
        .into_iter()
        .filter(|(_, count)| *count as f64 > limit)
        .map(|(value, _)| value)
        .collect();

    let other = GroupValue::text(OTHER_CATEGORY);
    let labels = view
        .iter()
        .map(|(index, record)| {
            let value = record.value(dimension);
            let label = if kept.contains(&value) {
                value
            } else {
                other.clone()
            };
            (index, label)
        })
        .collect();

    CollapsedCategories {
        dimension,
        labels,
        kept,
    }
}
