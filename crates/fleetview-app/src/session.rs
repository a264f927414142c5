//! Session ingest - builds the record store once per dataset

use std::collections::BTreeSet;
use std::path::Path;

use fleetview_domain::model::{FilterSelection, RawRecord};
use fleetview_domain::repository::{CoordinateSource, NoCoordinates};
use fleetview_infra::{load_raw_records, ZipTable};
use fleetview_store::{GeocodeResolver, GeocodeStats, RecordStore, RejectionReport};
use fleetview_types::{Error, QueryError, Result};
use tracing::info;

use crate::config::Config;
use crate::query::{query, QueryOptions, QueryResult, ViewKind};

/// Record store plus the geocode cache that lives as long as it
pub struct Session<S> {
    resolver: GeocodeResolver<S>,
    store: RecordStore,
    report: RejectionReport,
}

impl<S: CoordinateSource> Session<S> {
    /// One-time ingest: prefetch coordinates for every distinct ZIP on
    /// `geocode_jobs` threads, then validate and build the store.
    pub fn initialize(raw: Vec<RawRecord>, source: S, geocode_jobs: usize) -> Self {
        let resolver = GeocodeResolver::new(source);
        resolver.prefetch(
            raw.iter().filter_map(|row| row.zip_code.as_deref()),
            geocode_jobs,
        );
        let (store, report) = RecordStore::build(raw, &resolver);
        Self {
            resolver,
            store,
            report,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn report(&self) -> &RejectionReport {
        &self.report
    }

    pub fn geocode_stats(&self) -> GeocodeStats {
        self.resolver.stats()
    }

    pub fn query(
        &self,
        selection: &FilterSelection,
        views: &BTreeSet<ViewKind>,
        options: &QueryOptions,
    ) -> std::result::Result<QueryResult, QueryError> {
        query(&self.store, selection, views, options)
    }
}

/// Load `dataset` and the configured ZIP table, then ingest
pub fn open_session(config: &Config, dataset: &Path) -> Result<Session<Box<dyn CoordinateSource>>> {
    if !dataset.exists() {
        return Err(Error::FileNotFound(dataset.display().to_string()));
    }
    let raw = load_raw_records(dataset)?;

    let source: Box<dyn CoordinateSource> = match &config.zip_table_path {
        Some(path) if !path.exists() => {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        Some(path) => Box::new(ZipTable::load(path)?),
        None => Box::new(NoCoordinates),
    };

    let session = Session::initialize(raw, source, config.geocode_jobs);
    let stats = session.geocode_stats();
    info!(
        dataset = %dataset.display(),
        records = session.store().len(),
        rejected = session.report().rejected_count(),
        zip_codes = stats.cached,
        unresolved = stats.misses,
        "session ready"
    );
    Ok(session)
}
