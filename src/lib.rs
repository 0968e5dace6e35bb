//! Cloud Foundry Service Broker Library

pub mod catalog;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use catalog::{build_catalog, Catalog};
pub use config::{Configuration, ConfigStore};
pub use http::BrokerServer;
pub use lifecycle::Shutdown;
