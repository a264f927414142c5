//! Fleetview application layer
//!
//! Orchestrates between the presentation front end and the
//! domain/store/infrastructure crates:
//! - `config`: persisted settings
//! - `session`: one-time ingest of a dataset into a record store
//! - `query`: per-interaction view computation

pub mod config;
pub mod query;
pub mod session;

pub use config::Config;
pub use query::{query, query_named, QueryOptions, QueryResult, ViewKind, ViewResult};
pub use session::{open_session, Session};
