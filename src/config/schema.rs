//! Broker definition schema.
//!
//! This module defines the structure of the broker definition file.
//! All types derive Serde traits for deserialization from YAML and reject
//! unknown fields, so a typo surfaces as a parse error instead of a silently
//! defaulted value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root of the broker definition file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    /// Settings of the broker endpoint itself.
    pub server: ServerSection,

    /// Cloud Foundry targets offered as plans, keyed by target name.
    ///
    /// A `BTreeMap` keeps the iteration order sorted by name, which is the
    /// order plans are published in.
    #[serde(default, rename = "cloudfoundries")]
    pub targets: BTreeMap<String, TargetDescriptor>,
}

impl Configuration {
    /// Target names in publication order.
    pub fn target_names(&self) -> Vec<&str> {
        self.targets.keys().map(String::as_str).collect()
    }
}

/// `server` section of the definition file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Credentials the platform must present on every protected request.
    #[serde(rename = "basicauth")]
    pub basic_auth: BasicAuth,
}

/// A single shared HTTP Basic credential pair.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    /// Exact comparison against submitted credentials.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A Cloud Foundry installation published as a plan.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TargetDescriptor {
    /// Cloud Controller API endpoint.
    #[serde(rename = "apiURL")]
    pub api_url: String,

    /// UAA endpoint used to obtain tokens.
    #[serde(rename = "uaaURL")]
    pub uaa_url: String,

    pub username: String,
    pub password: String,

    /// Free-form labels copied into the plan metadata.
    #[serde(default)]
    pub labels: Vec<String>,
}

impl std::fmt::Debug for TargetDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetDescriptor")
            .field("api_url", &self.api_url)
            .field("uaa_url", &self.uaa_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("labels", &self.labels)
            .finish()
    }
}
