//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, transport layers)
//!     → request_id.rs (x-request-id)
//!     → middleware/ (log → auth → version → identity → freshness)
//!     → handlers/ (catalog, provision, health, version)
//!     → conditional.rs (304 handling for the catalog)
//!     → error.rs (JSON error bodies for every rejection)
//! ```

pub mod conditional;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod request_id;
pub mod server;

pub use error::{ApiError, ErrorBody};
pub use request_id::X_REQUEST_ID;
pub use server::{AppState, BrokerServer};
