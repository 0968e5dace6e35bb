//! Catalog construction from a broker definition.

use serde_json::Map;

use crate::catalog::model::{Catalog, Plan, PlanMetadata, Service};
use crate::config::Configuration;

pub const SERVICE_ID: &str = "cf";
pub const SERVICE_NAME: &str = "cloudfoundry";
pub const SERVICE_DESCRIPTION: &str = "Cloud Foundry API Service";
const SERVICE_TAGS: [&str; 4] = ["cf", "api", "cloudfoundry", "cloud controller"];
const MAXIMUM_POLLING_DURATION: u32 = 10;

/// Build the catalog for a configuration snapshot.
///
/// Emits a single service with one plan per target, ordered by target name.
pub fn build_catalog(config: &Configuration) -> Catalog {
    // `targets` is a BTreeMap, so iteration is already sorted by name.
    let plans = config
        .targets
        .iter()
        .map(|(name, target)| Plan {
            id: name.clone(),
            name: name.clone(),
            description: format!("Cloud Controller API of {}", name),
            metadata: PlanMetadata {
                labels: target.labels.clone(),
            },
            free: true,
            bindable: true,
            plan_updateable: true,
            maximum_polling_duration: MAXIMUM_POLLING_DURATION,
        })
        .collect();

    Catalog {
        services: vec![Service {
            id: SERVICE_ID.to_string(),
            name: SERVICE_NAME.to_string(),
            description: SERVICE_DESCRIPTION.to_string(),
            tags: SERVICE_TAGS.iter().map(|t| t.to_string()).collect(),
            requires: Vec::new(),
            bindable: true,
            instances_retrievable: true,
            bindings_retrievable: true,
            allow_context_updates: true,
            metadata: Map::new(),
            plan_updateable: true,
            plans,
        }],
    }
}
