//! Query Service - per-interaction view computation
//!
//! Each call filters the immutable record store once, then derives every
//! requested view from that filtered subset independently.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use fleetview_domain::model::{AggregateRow, Dimension, FilterSelection, Frame, GeoCount, RecordView};
use fleetview_domain::service::{
    apply, build_frames, collapse, geo_counts, group_count, group_count_with, sort_by_count_desc,
    DEFAULT_COLLAPSE_THRESHOLD,
};
use fleetview_store::RecordStore;
use fleetview_types::QueryError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;

/// Views the presentation layer can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    TypeDistribution,
    FuelDistribution,
    AccessibilitySplit,
    MakeDistribution,
    YearTrend,
    FuelRequirementFrames,
    GeoDistribution,
}

impl ViewKind {
    pub const ALL: [ViewKind; 7] = [
        ViewKind::TypeDistribution,
        ViewKind::FuelDistribution,
        ViewKind::AccessibilitySplit,
        ViewKind::MakeDistribution,
        ViewKind::YearTrend,
        ViewKind::FuelRequirementFrames,
        ViewKind::GeoDistribution,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ViewKind::TypeDistribution => "type-distribution",
            ViewKind::FuelDistribution => "fuel-distribution",
            ViewKind::AccessibilitySplit => "accessibility-split",
            ViewKind::MakeDistribution => "make-distribution",
            ViewKind::YearTrend => "year-trend",
            ViewKind::FuelRequirementFrames => "fuel-requirement-frames",
            ViewKind::GeoDistribution => "geo-distribution",
        }
    }

    /// Column headers of the view's result table
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            ViewKind::TypeDistribution => &["Vehicle Type", "Count"],
            ViewKind::FuelDistribution => &["Fuel Source", "Count"],
            ViewKind::AccessibilitySplit => &["Wheelchair Accessible", "Count"],
            ViewKind::MakeDistribution => &["Vehicle Make", "Count"],
            ViewKind::YearTrend => &["Model Year", "Count"],
            ViewKind::FuelRequirementFrames => &["Model Year", "Fuel Source", "Status", "Count"],
            ViewKind::GeoDistribution => &["ZIP Code", "Latitude", "Longitude", "Count"],
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        ViewKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| QueryError::InvalidView(s.to_string()))
    }
}

/// Result table of a single view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "rows", rename_all = "kebab-case")]
pub enum ViewResult {
    Counts(Vec<AggregateRow>),
    Frames(Vec<Frame>),
    Locations(Vec<GeoCount>),
}

impl ViewResult {
    /// Records accounted for by the table
    pub fn total(&self) -> usize {
        match self {
            ViewResult::Counts(rows) => rows.iter().map(|r| r.count).sum(),
            ViewResult::Frames(frames) => frames.iter().map(Frame::total).sum(),
            ViewResult::Locations(locations) => locations.iter().map(|l| l.count).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ViewResult::Counts(rows) => rows.is_empty(),
            ViewResult::Frames(frames) => frames.is_empty(),
            ViewResult::Locations(locations) => locations.is_empty(),
        }
    }
}

pub type QueryResult = BTreeMap<ViewKind, ViewResult>;

/// Tunables applied per query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryOptions {
    pub collapse_threshold: f64,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            collapse_threshold: DEFAULT_COLLAPSE_THRESHOLD,
        }
    }
}

impl QueryOptions {
    pub fn with_collapse_threshold(mut self, threshold: f64) -> Self {
        self.collapse_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<(), QueryError> {
        if (0.0..=1.0).contains(&self.collapse_threshold) {
            Ok(())
        } else {
            Err(QueryError::InvalidThreshold(self.collapse_threshold.to_string()))
        }
    }
}

impl From<&Config> for QueryOptions {
    fn from(config: &Config) -> Self {
        Self {
            collapse_threshold: config.collapse_threshold,
        }
    }
}

/// Compute the requested views over the records matching `selection`
pub fn query(
    store: &RecordStore,
    selection: &FilterSelection,
    views: &BTreeSet<ViewKind>,
    options: &QueryOptions,
) -> Result<QueryResult, QueryError> {
    options.validate()?;

    let filtered = apply(store.all(), selection);
    debug!(
        total = store.len(),
        filtered = filtered.len(),
        views = views.len(),
        "evaluating query"
    );

    Ok(views
        .iter()
        .map(|&kind| (kind, compute_view(kind, &filtered, options)))
        .collect())
}

/// [`query`] for callers holding untyped field and view names.
///
/// Any unknown field or view rejects the whole query.
pub fn query_named<I, K, V, S, W>(
    store: &RecordStore,
    selection: I,
    views: W,
    options: &QueryOptions,
) -> Result<QueryResult, QueryError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: IntoIterator<Item = S>,
    S: Into<String>,
    W: IntoIterator,
    W::Item: AsRef<str>,
{
    let selection = FilterSelection::from_named(selection)?;
    let views = views
        .into_iter()
        .map(|name| name.as_ref().parse::<ViewKind>())
        .collect::<Result<BTreeSet<ViewKind>, _>>()?;
    query(store, &selection, &views, options)
}

fn compute_view(kind: ViewKind, view: &RecordView<'_>, options: &QueryOptions) -> ViewResult {
    match kind {
        ViewKind::TypeDistribution => ViewResult::Counts(group_count(view, &[Dimension::Type])),
        ViewKind::FuelDistribution => {
            ViewResult::Counts(group_count(view, &[Dimension::FuelSource]))
        }
        ViewKind::AccessibilitySplit => {
            ViewResult::Counts(group_count(view, &[Dimension::WheelchairAccessible]))
        }
        ViewKind::MakeDistribution => {
            let collapsed = collapse(view, Dimension::Make, options.collapse_threshold);
            let mut rows = group_count_with(view, &[Dimension::Make], &[&collapsed]);
            sort_by_count_desc(&mut rows);
            ViewResult::Counts(rows)
        }
        ViewKind::YearTrend => ViewResult::Counts(group_count(view, &[Dimension::ModelYear])),
        ViewKind::FuelRequirementFrames => ViewResult::Frames(build_frames(
            view,
            Dimension::ModelYear,
            &[Dimension::FuelSource, Dimension::Status],
        )),
        ViewKind::GeoDistribution => ViewResult::Locations(geo_counts(view)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_kind_parse() {
        assert_eq!("year-trend".parse::<ViewKind>(), Ok(ViewKind::YearTrend));
        assert_eq!("Geo_Distribution".parse::<ViewKind>(), Ok(ViewKind::GeoDistribution));
        assert_eq!(
            "pie".parse::<ViewKind>(),
            Err(QueryError::InvalidView("pie".to_string()))
        );
    }

    #[test]
    fn test_threshold_validation() {
        assert!(QueryOptions::default().validate().is_ok());
        assert!(QueryOptions::default()
            .with_collapse_threshold(-0.1)
            .validate()
            .is_err());
        assert!(QueryOptions::default()
            .with_collapse_threshold(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_empty_store_yields_empty_views() {
        let store = RecordStore::default();
        let views: BTreeSet<_> = ViewKind::ALL.into_iter().collect();
        let result = query(&store, &FilterSelection::new(), &views, &QueryOptions::default()).unwrap();
        assert_eq!(result.len(), ViewKind::ALL.len());
        assert!(result.values().all(ViewResult::is_empty));
    }
}
