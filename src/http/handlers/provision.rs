//! Service instance provisioning.
//!
//! Only the request decoding is real: any well-formed request is acknowledged
//! without creating anything.

use axum::{body::Bytes, extract::Path, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::http::error::ApiError;

/// Body of `PUT /v2/service_instances/{instance_id}/`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProvisionRequest {
    pub service_id: String,
    pub plan_id: String,
    #[serde(default)]
    pub context: Option<Value>,
    #[serde(default)]
    pub organization_guid: Option<String>,
    #[serde(default)]
    pub space_guid: Option<String>,
    #[serde(default)]
    pub parameters: Option<Map<String, Value>>,
    #[serde(default)]
    pub maintenance_info: Option<Value>,
}

/// Acknowledgment returned for a provision request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvisionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
    #[serde(default)]
    pub metadata: InstanceMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceMetadata {
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub labels: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

/// Decode a provision request body.
pub fn decode_provision_request(body: &[u8]) -> Result<ProvisionRequest, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::MalformedRequest(e.to_string()))
}

/// `PUT /v2/service_instances/{instance_id}/`
pub async fn provision_instance(
    Path(instance_id): Path<String>,
    body: Bytes,
) -> Result<Json<ProvisionResponse>, ApiError> {
    let request = decode_provision_request(&body)?;

    tracing::info!(
        instance_id = %instance_id,
        service_id = %request.service_id,
        plan_id = %request.plan_id,
        "Provision request acknowledged"
    );

    Ok(Json(ProvisionResponse::default()))
}
