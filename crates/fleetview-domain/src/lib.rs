//! Fleet domain: record model, filter/aggregate services, repository traits

pub mod model;
pub mod repository;
pub mod service;
