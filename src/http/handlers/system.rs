use axum::{
    extract::{OriginalUri, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub build_version: String,
    pub build_commit: String,
}

/// `GET /health/`
pub async fn get_health() -> Json<HealthStatus> {
    Json(HealthStatus { ok: true })
}

/// `GET /version/`
pub async fn get_version(State(state): State<AppState>) -> Json<VersionInfo> {
    Json(VersionInfo {
        build_version: state.build_info.version.clone(),
        build_commit: state.build_info.commit.clone(),
    })
}

/// Permanent redirect to the trailing-slash form of the requested path.
pub async fn redirect_with_slash(OriginalUri(uri): OriginalUri) -> Response {
    let location = match uri.query() {
        Some(query) => format!("{}/?{}", uri.path(), query),
        None => format!("{}/", uri.path()),
    };
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}
