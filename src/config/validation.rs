//! Broker definition validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject blank credentials that would make the auth stage meaningless
//! - Check that target endpoints are absolute URLs
//!
//! Returns all validation errors, not just the first. Validation is a pure
//! function and runs before a parsed definition is accepted into the cache.

use thiserror::Error;
use url::Url;

use crate::config::schema::Configuration;

/// A single semantic problem found in a broker definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("server.basicauth.{0} must not be blank")]
    BlankCredential(&'static str),

    #[error("target name must not be blank")]
    BlankTargetName,

    #[error("target '{target}': {field} must not be blank")]
    BlankTargetField { target: String, field: &'static str },

    #[error("target '{target}': {field} is not an absolute URL: {value}")]
    InvalidUrl {
        target: String,
        field: &'static str,
        value: String,
    },
}

/// Validate a parsed definition.
pub fn validate_config(config: &Configuration) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let auth = &config.server.basic_auth;
    if auth.username.trim().is_empty() {
        errors.push(ValidationError::BlankCredential("username"));
    }
    if auth.password.trim().is_empty() {
        errors.push(ValidationError::BlankCredential("password"));
    }

    for (name, target) in &config.targets {
        if name.trim().is_empty() {
            errors.push(ValidationError::BlankTargetName);
            continue;
        }

        for (field, value) in [("apiURL", &target.api_url), ("uaaURL", &target.uaa_url)] {
            if Url::parse(value).is_err() {
                errors.push(ValidationError::InvalidUrl {
                    target: name.clone(),
                    field,
                    value: value.clone(),
                });
            }
        }

        for (field, value) in [("username", &target.username), ("password", &target.password)] {
            if value.trim().is_empty() {
                errors.push(ValidationError::BlankTargetField {
                    target: name.clone(),
                    field,
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
