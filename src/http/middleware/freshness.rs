//! Cache validators for broker responses.
//!
//! The snapshot is taken before the handler runs, so `ETag` and
//! `Last-Modified` describe the definition the handler is about to serve.
//! Handlers read that same [`ConfigSnapshot`] from the request extensions
//! instead of going back to the store.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::config::{ConfigSnapshot, Freshness};
use crate::http::conditional::http_date;
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Set `ETag` and `Last-Modified` from a freshness snapshot.
pub fn apply_freshness(headers: &mut HeaderMap, freshness: &Freshness) {
    if let Ok(etag) = HeaderValue::from_str(&freshness.etag()) {
        headers.insert(header::ETAG, etag);
    }
    if let Some(modified) = freshness.last_modified {
        if let Ok(value) = HeaderValue::from_str(&http_date(modified)) {
            headers.insert(header::LAST_MODIFIED, value);
        }
    }
}

pub async fn freshness_headers(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let snapshot: ConfigSnapshot = state.snapshot().await?;
    let freshness = snapshot.freshness;
    request.extensions_mut().insert(snapshot);

    let mut response = next.run(request).await;
    apply_freshness(response.headers_mut(), &freshness);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    #[test]
    fn test_apply_freshness_sets_both_validators() {
        let mut headers = HeaderMap::new();
        let freshness = Freshness {
            hash: 1234,
            last_modified: Some(SystemTime::UNIX_EPOCH + Duration::from_secs(784_111_777)),
        };
        apply_freshness(&mut headers, &freshness);

        assert_eq!(headers[header::ETAG], "W/\"1234\"");
        assert_eq!(headers[header::LAST_MODIFIED], "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_no_last_modified_before_first_read() {
        let mut headers = HeaderMap::new();
        apply_freshness(
            &mut headers,
            &Freshness {
                hash: 0,
                last_modified: None,
            },
        );
        assert!(headers.contains_key(header::ETAG));
        assert!(!headers.contains_key(header::LAST_MODIFIED));
    }
}
