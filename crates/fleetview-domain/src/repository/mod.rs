//! Repository trait definitions for external data sources

use std::sync::Arc;

use fleetview_types::GeocodeError;

use crate::model::Coordinates;

/// External lookup from a normalized 5-digit ZIP to coordinates.
///
/// `Ok(None)` means the source answered but knows no location for the code.
/// Implementations are called from several threads during prefetch.
pub trait CoordinateSource: Send + Sync {
    fn lookup(&self, zip: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

impl<S: CoordinateSource + ?Sized> CoordinateSource for Box<S> {
    fn lookup(&self, zip: &str) -> Result<Option<Coordinates>, GeocodeError> {
        (**self).lookup(zip)
    }
}

impl<S: CoordinateSource + ?Sized> CoordinateSource for Arc<S> {
    fn lookup(&self, zip: &str) -> Result<Option<Coordinates>, GeocodeError> {
        (**self).lookup(zip)
    }
}

/// Source that never resolves anything; used when no gazetteer is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCoordinates;

impl CoordinateSource for NoCoordinates {
    fn lookup(&self, _zip: &str) -> Result<Option<Coordinates>, GeocodeError> {
        Ok(None)
    }
}
