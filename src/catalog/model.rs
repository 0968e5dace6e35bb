//! Catalog document types as published on `/v2/catalog/`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level catalog document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub services: Vec<Service>,
}

/// An offerable service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub requires: Vec<String>,
    pub bindable: bool,
    pub instances_retrievable: bool,
    pub bindings_retrievable: bool,
    pub allow_context_updates: bool,
    pub metadata: Map<String, Value>,
    pub plan_updateable: bool,
    pub plans: Vec<Plan>,
}

/// A plan of a service; one per configured target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub description: String,
    pub metadata: PlanMetadata,
    pub free: bool,
    pub bindable: bool,
    pub plan_updateable: bool,
    /// Seconds a platform should keep polling asynchronous operations.
    pub maximum_polling_duration: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanMetadata {
    pub labels: Vec<String>,
}
