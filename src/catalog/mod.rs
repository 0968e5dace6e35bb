//! Service catalog published to the platform.
//!
//! The catalog is derived purely from a configuration snapshot; building it
//! performs no I/O.

pub mod builder;
pub mod model;

pub use builder::build_catalog;
pub use model::{Catalog, Plan, PlanMetadata, Service};
