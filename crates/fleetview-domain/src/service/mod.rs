//! Domain services: pure functions over record views

pub mod aggregator;
pub mod category_collapser;
pub mod filter_engine;
pub mod frame_builder;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregator::{geo_counts, group_count, group_count_with, sort_by_count_desc};
pub use category_collapser::{
    collapse, CollapsedCategories, DEFAULT_COLLAPSE_THRESHOLD, OTHER_CATEGORY,
};
pub use filter_engine::apply;
pub use frame_builder::build_frames;
