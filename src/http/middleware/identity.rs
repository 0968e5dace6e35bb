//! Identity propagation headers.
//!
//! Both headers are informational: they are logged for audit and never used
//! for authorization. A malformed value is logged and otherwise ignored; it
//! must not change the outcome of the request.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{Map, Value};
use thiserror::Error;

pub const HEADER_ORIGINATING_IDENTITY: &str = "X-Broker-API-Originating-Identity";
pub const HEADER_REQUEST_IDENTITY: &str = "X-Broker-API-Request-Identity";

/// Decoded `X-Broker-API-Originating-Identity` value.
#[derive(Debug, Clone, PartialEq)]
pub struct OriginatingIdentity {
    /// Platform that issued the request, e.g. `cloudfoundry`.
    pub platform: String,
    /// Platform-specific identity properties, e.g. `user_id`.
    pub properties: Map<String, Value>,
}

impl OriginatingIdentity {
    pub fn user_id(&self) -> Option<&str> {
        self.properties.get("user_id").and_then(Value::as_str)
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("expected '<platform> <base64 json>'")]
    Format,

    #[error("identity value is not base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("identity value is not JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("identity value is not a JSON object")]
    NotAnObject,
}

/// Parse `"<platform> <base64(json object)>"`.
pub fn parse_originating_identity(value: &str) -> Result<OriginatingIdentity, IdentityError> {
    let mut parts = value.split_whitespace();
    let (platform, encoded) = match (parts.next(), parts.next(), parts.next()) {
        (Some(platform), Some(encoded), None) => (platform, encoded),
        _ => return Err(IdentityError::Format),
    };

    let decoded = STANDARD.decode(encoded)?;
    match serde_json::from_slice::<Value>(&decoded)? {
        Value::Object(properties) => Ok(OriginatingIdentity {
            platform: platform.to_string(),
            properties,
        }),
        _ => Err(IdentityError::NotAnObject),
    }
}

/// Log the originating identity and expose it to handlers as an extension.
pub async fn log_originating_identity(mut request: Request<Body>, next: Next) -> Response {
    let header = request
        .headers()
        .get(HEADER_ORIGINATING_IDENTITY)
        .map(|h| String::from_utf8_lossy(h.as_bytes()).into_owned());

    match header {
        Some(value) => match parse_originating_identity(&value) {
            Ok(identity) => {
                tracing::info!(
                    platform = %identity.platform,
                    user_id = identity.user_id().unwrap_or("-"),
                    properties = %serde_json::Value::Object(identity.properties.clone()),
                    "Originating identity"
                );
                request.extensions_mut().insert(identity);
            }
            Err(e) => {
                tracing::warn!(error = %e, value = %value, "Ignoring malformed originating identity");
            }
        },
        None => tracing::debug!("Header {} not set", HEADER_ORIGINATING_IDENTITY),
    }

    next.run(request).await
}

/// Log the request identity verbatim.
pub async fn log_request_identity(request: Request<Body>, next: Next) -> Response {
    match request.headers().get(HEADER_REQUEST_IDENTITY) {
        Some(value) => tracing::info!(
            request_identity = %String::from_utf8_lossy(value.as_bytes()),
            "Request identity"
        ),
        None => tracing::debug!("Header {} not set", HEADER_REQUEST_IDENTITY),
    }

    next.run(request).await
}
