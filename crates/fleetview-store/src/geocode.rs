//! Memoizing ZIP → coordinate resolution

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use dashmap::DashMap;
use fleetview_domain::model::Coordinates;
use fleetview_domain::repository::CoordinateSource;
use tracing::{debug, warn};

/// Raw values that mean "no ZIP" rather than a code to look up
const ABSENT_MARKERS: [&str; 5] = ["", "unknown", "nan", "none", "null"];

/// Normalize a raw ZIP value to five digits.
///
/// Drops any fractional suffix (`"2134.0"`), keeps the prefix of ZIP+4
/// forms, and restores leading zeros lost by numeric exports. Returns
/// `None` for absent markers, all-zero codes and anything non-numeric.
pub fn normalize_zip(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let integral = trimmed.split_once('.').map_or(trimmed, |(head, _)| head);
    if ABSENT_MARKERS.contains(&integral.to_ascii_lowercase().as_str()) {
        return None;
    }

    let head = integral.split_once('-').map_or(integral, |(head, _)| head);
    if head.is_empty() || !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let zip = match head.len() {
        5 => head.to_string(),
        9 => head[..5].to_string(),
        n if n < 5 => format!("{:0>5}", head),
        _ => return None,
    };

    if zip.bytes().all(|b| b == b'0') {
        None
    } else {
        Some(zip)
    }
}

/// Snapshot of resolver activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeocodeStats {
    /// Distinct normalized codes cached
    pub cached: usize,
    /// Cached codes that resolved to coordinates
    pub resolved: usize,
    /// Cached codes with no coordinates
    pub misses: usize,
    /// Requests answered from the cache
    pub hits: usize,
    /// Calls made to the coordinate source
    pub source_lookups: usize,
}

/// Geocode resolver with a per-session cache.
///
/// Each distinct normalized ZIP reaches the source at most once in
/// sequential use. Failures are cached as `None` so they are not retried.
/// Concurrent first requests for the same code may both hit the source;
/// the first insert wins and later readers see that value.
pub struct GeocodeResolver<S> {
    source: S,
    cache: DashMap<String, Option<Coordinates>>,
    hits: AtomicUsize,
    source_lookups: AtomicUsize,
}

impl<S: CoordinateSource> GeocodeResolver<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: DashMap::new(),
            hits: AtomicUsize::new(0),
            source_lookups: AtomicUsize::new(0),
        }
    }

    /// Coordinates for a raw ZIP value; `None` for absent, invalid or unresolvable codes
    pub fn resolve(&self, zip: Option<&str>) -> Option<Coordinates> {
        let zip = normalize_zip(zip?)?;
        self.resolve_normalized(&zip)
    }

    /// Coordinates for an already-normalized ZIP
    pub fn resolve_normalized(&self, zip: &str) -> Option<Coordinates> {
        if let Some(cached) = self.cache.get(zip) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return *cached;
        }

        let resolved = self.lookup_source(zip);
        *self.cache.entry(zip.to_string()).or_insert(resolved)
    }

    /// Resolve every distinct code in `zips` up front on `jobs` worker
    /// threads (0 = one per CPU). Codes already cached are skipped.
    pub fn prefetch<'z, I>(&self, zips: I, jobs: usize)
    where
        I: IntoIterator<Item = &'z str>,
    {
        let pending: Vec<String> = zips
            .into_iter()
            .filter_map(normalize_zip)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|zip| !self.cache.contains_key(zip))
            .collect();
        if pending.is_empty() {
            return;
        }

        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        let jobs = jobs.clamp(1, pending.len());
        let chunk_size = pending.len().div_ceil(jobs);
        debug!(codes = pending.len(), jobs, "prefetching ZIP coordinates");

        thread::scope(|scope| {
            for chunk in pending.chunks(chunk_size) {
                scope.spawn(move || {
                    for zip in chunk {
                        self.resolve_normalized(zip);
                    }
                });
            }
        });
    }

    /// Cached result for a normalized ZIP, if it has been looked up
    pub fn cached(&self, zip: &str) -> Option<Option<Coordinates>> {
        self.cache.get(zip).map(|entry| *entry)
    }

    pub fn stats(&self) -> GeocodeStats {
        let cached = self.cache.len();
        let resolved = self.cache.iter().filter(|entry| entry.is_some()).count();
        GeocodeStats {
            cached,
            resolved,
            misses: cached - resolved,
            hits: self.hits.load(Ordering::Relaxed),
            source_lookups: self.source_lookups.load(Ordering::Relaxed),
        }
    }

    fn lookup_source(&self, zip: &str) -> Option<Coordinates> {
        self.source_lookups.fetch_add(1, Ordering::Relaxed);
        match self.source.lookup(zip) {
            Ok(Some(coords)) if coords.is_valid() => Some(coords),
            Ok(Some(coords)) => {
                warn!(
                    zip,
                    latitude = coords.latitude,
                    longitude = coords.longitude,
                    "coordinate source returned out-of-range location"
                );
                None
            }
            Ok(None) => {
                debug!(zip, "ZIP not found in coordinate source");
                None
            }
            Err(e) => {
                warn!(zip, error = %e, "coordinate lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetview_types::GeocodeError;
    use std::sync::Arc;

    /// Knows 02134 and 60601; fails for 99999; counts calls.
    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    impl CoordinateSource for CountingSource {
        fn lookup(&self, zip: &str) -> Result<Option<Coordinates>, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match zip {
                "02134" => Ok(Some(Coordinates::new(42.35, -71.13))),
                "60601" => Ok(Some(Coordinates::new(41.88, -87.62))),
                "99999" => Err(GeocodeError::Unavailable("timeout".to_string())),
                "12345" => Ok(Some(Coordinates::new(123.0, 0.0))),
                _ => Ok(None),
            }
        }
    }

    fn resolver() -> (Arc<CountingSource>, GeocodeResolver<Arc<CountingSource>>) {
        let source = Arc::new(CountingSource::default());
        (source.clone(), GeocodeResolver::new(source))
    }

    #[test]
    fn test_normalize_zip_variants() {
        assert_eq!(normalize_zip("02134"), Some("02134".to_string()));
        assert_eq!(normalize_zip("2134.0"), Some("02134".to_string()));
        assert_eq!(normalize_zip(" 60601 "), Some("60601".to_string()));
        assert_eq!(normalize_zip("60601-1234"), Some("60601".to_string()));
        assert_eq!(normalize_zip("606011234"), Some("60601".to_string()));
    }

    #[test]
    fn test_normalize_zip_absent_markers() {
        for raw in ["", "unknown", "nan", "NaN", "None", "0", "0.0", "00000", "abcde", "1234567"] {
            assert_eq!(normalize_zip(raw), None, "{raw:?} should be absent");
        }
    }

    #[test]
    fn test_absent_zip_never_reaches_source() {
        let (source, resolver) = resolver();
        assert_eq!(resolver.resolve(Some("00000")), None);
        assert_eq!(resolver.resolve(Some("unknown")), None);
        assert_eq!(resolver.resolve(None), None);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_repeated_resolution_is_cached() {
        let (source, resolver) = resolver();
        let first = resolver.resolve(Some("02134"));
        let second = resolver.resolve(Some("2134.0"));
        assert_eq!(first, second);
        assert!(first.is_some());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.stats().hits, 1);
    }

    #[test]
    fn test_failures_are_cached_without_flapping() {
        let (source, resolver) = resolver();
        for _ in 0..3 {
            assert_eq!(resolver.resolve(Some("99999")), None);
            assert_eq!(resolver.resolve(Some("11111")), None);
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(resolver.cached("99999"), Some(None));

        let stats = resolver.stats();
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.resolved, 0);
    }

    #[test]
    fn test_out_of_range_coordinates_are_a_miss() {
        let (_, resolver) = resolver();
        assert_eq!(resolver.resolve(Some("12345")), None);
    }

    #[test]
    fn test_prefetch_resolves_each_code_once() {
        let (source, resolver) = resolver();
        let zips = ["02134", "60601", "2134.0", "99999", "unknown", "60601", "55555"];
        resolver.prefetch(zips.iter().copied(), 4);

        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
        assert_eq!(resolver.stats().cached, 4);
        assert!(resolver.resolve(Some("60601")).is_some());
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);

        resolver.prefetch(zips.iter().copied(), 0);
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
    }
}
