//! Domain model types

pub mod aggregate;
pub mod raw_record;
pub mod selection;
pub mod vehicle;
pub mod view;

pub use aggregate::{AggregateRow, Frame, GeoCount, GroupValue};
pub use raw_record::{RawRecord, REQUIRED_COLUMNS};
pub use selection::{FilterField, FilterSelection};
pub use vehicle::{Coordinates, Dimension, VehicleRecord};
pub use view::RecordView;
