use axum::{
    extract::Extension,
    http::{HeaderMap, Method},
    response::Response,
};

use crate::catalog::build_catalog;
use crate::config::ConfigSnapshot;
use crate::http::conditional::serve_json;
use crate::http::error::ApiError;

/// `GET /v2/catalog/`
///
/// Built from the snapshot the freshness stage took, so the body, the
/// conditional check and the validators all describe the same read.
pub async fn get_catalog(
    Extension(snapshot): Extension<ConfigSnapshot>,
    method: Method,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let catalog = build_catalog(&snapshot.config);
    let body = serde_json::to_vec(&catalog)
        .map_err(|e| ApiError::Internal(format!("failed to serialize catalog: {}", e)))?;

    tracing::debug!(plans = ?snapshot.config.target_names(), "Catalog built");

    Ok(serve_json(&method, &headers, &snapshot.freshness, body))
}
