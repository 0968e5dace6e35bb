//! Broker API version negotiation.
//!
//! Platforms announce the protocol version they speak in
//! `X-Broker-API-Version`. Only the major version has to match; any minor
//! version is accepted (a `2.2` platform talks to a `2.14` broker).

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::http::error::ApiError;

pub const HEADER_API_VERSION: &str = "X-Broker-API-Version";

/// Protocol version implemented by this broker.
pub const SUPPORTED_API_VERSION: &str = "2.14";

/// Major segment of a version string: everything before the first '.'.
fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or(version).trim()
}

/// Check a requested version against [`SUPPORTED_API_VERSION`].
pub fn check_api_version(requested: Option<&str>) -> Result<(), ApiError> {
    let requested = requested.map(str::trim).unwrap_or_default();
    if requested.is_empty() {
        return Err(ApiError::VersionMissing);
    }

    if major(requested) != major(SUPPORTED_API_VERSION) {
        return Err(ApiError::VersionMismatch {
            requested: requested.to_string(),
            supported: SUPPORTED_API_VERSION,
        });
    }

    Ok(())
}

/// Reject requests without a compatible `X-Broker-API-Version`.
pub async fn require_api_version(request: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let requested = request
        .headers()
        .get(HEADER_API_VERSION)
        .and_then(|h| h.to_str().ok());
    check_api_version(requested)?;

    let mut response = next.run(request).await;
    response.headers_mut().insert(
        HEADER_API_VERSION,
        HeaderValue::from_static(SUPPORTED_API_VERSION),
    );
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_version() {
        assert!(matches!(check_api_version(None), Err(ApiError::VersionMissing)));
        assert!(matches!(check_api_version(Some("  ")), Err(ApiError::VersionMissing)));
    }

    #[test]
    fn test_major_mismatch() {
        assert!(matches!(
            check_api_version(Some("1.2")),
            Err(ApiError::VersionMismatch { .. })
        ));
        assert!(matches!(
            check_api_version(Some("abc")),
            Err(ApiError::VersionMismatch { .. })
        ));
        assert!(matches!(
            check_api_version(Some("20.14")),
            Err(ApiError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_minor_difference_is_tolerated() {
        assert!(check_api_version(Some("2.2")).is_ok());
        assert!(check_api_version(Some("2.14")).is_ok());
        assert!(check_api_version(Some("2")).is_ok());
        assert!(check_api_version(Some(" 2.16 ")).is_ok());
    }
}
