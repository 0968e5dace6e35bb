//! Terminal request handlers.

pub mod catalog;
pub mod provision;
pub mod system;
