use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::Instrument;

use crate::http::request_id::X_REQUEST_ID;
use crate::observability::metrics;

/// Outermost stage: one span per request, timing everything below it,
/// rejections included.
pub async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let span = tracing::info_span!("request", %method, %uri, request_id = %request_id);

    async move {
        tracing::debug!("Request received");
        let response = next.run(request).await;
        let status = response.status();

        tracing::info!(
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request finished"
        );
        metrics::record_request(method.as_str(), status.as_u16(), start);
        response
    }
    .instrument(span)
    .await
}
