//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! broker definition (YAML)
//!     → store.rs (staleness check by mtime fingerprint, single lock)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → cached Configuration, handed out as deep copies
//!
//! process settings (flags / env)
//!     → settings.rs (BrokerSettings, BuildInfo)
//! ```
//!
//! # Design Decisions
//! - The definition is re-read lazily on access, never pushed by a watcher
//! - A failed reload never replaces the last good definition
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod settings;
pub mod store;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{BasicAuth, Configuration, ServerSection, TargetDescriptor};
pub use settings::{BrokerSettings, BuildInfo};
pub use store::{ConfigSnapshot, ConfigStore, Freshness};
