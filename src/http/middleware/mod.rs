//! Request pipeline stages.
//!
//! # Order (outer to inner)
//! ```text
//! logging    → span + timing for everything below
//! auth       → Basic credentials against the broker definition (401/500)
//! version    → X-Broker-API-Version major match (412)
//! identity   → originating / request identity, log only
//! freshness  → ETag + Last-Modified from the snapshot the handler will use
//! handler
//! ```
//!
//! Each stage either forwards the request or short-circuits with an
//! [`ApiError`](crate::http::error::ApiError) response.

pub mod auth;
pub mod freshness;
pub mod identity;
pub mod logging;
pub mod version;
