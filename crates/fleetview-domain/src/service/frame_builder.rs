//! Time-indexed frames for sequential rendering

use std::collections::BTreeMap;

use crate::model::{Dimension, Frame, GroupValue, RecordView};

use super::aggregator::group_count;

/// Partition `view` by `time` and count each partition over `group`.
///
/// Frames are strictly ascending by time value. Time values with no
/// records produce no frame; callers wanting a dense axis pad themselves.
pub fn build_frames(view: &RecordView<'_>, time: Dimension, group: &[Dimension]) -> Vec<Frame> {
    let mut partitions: BTreeMap<GroupValue, Vec<usize>> = BTreeMap::new();
    for (index, record) in view.iter() {
        partitions.entry(record.value(time)).or_default().push(index);
    }

    partitions
        .into_iter()
        .map(|(time_value, indices)| {
            let bucket = RecordView::from_indices(view.source(), indices);
            Frame {
                time_value,
                rows: group_count(&bucket, group),
            }
        })
        .collect()
}
