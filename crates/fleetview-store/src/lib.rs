//! Session-lifetime stores: the geocode cache and the validated record set

pub mod geocode;
pub mod records;

pub use geocode::{normalize_zip, GeocodeResolver, GeocodeStats};
pub use records::{RecordStore, RejectedRow, RejectionReport};
