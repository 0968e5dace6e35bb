//! Conditional GET support.
//!
//! `If-None-Match` takes precedence over `If-Modified-Since`. Entity tags are
//! compared weakly. Modification times are compared at whole-second
//! resolution because HTTP dates carry no fractions.

use std::time::SystemTime;

use axum::{
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};

use crate::config::Freshness;

/// Format a timestamp as an IMF-fixdate (`Sun, 06 Nov 1994 08:49:37 GMT`).
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Parse an HTTP date; `None` for anything unparseable.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

fn opaque_tag(tag: &str) -> &str {
    tag.trim().strip_prefix("W/").unwrap_or(tag.trim())
}

fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    if if_none_match.trim() == "*" {
        return true;
    }
    if_none_match
        .split(',')
        .any(|candidate| opaque_tag(candidate) == opaque_tag(etag))
}

/// Whether the client's cached copy is still current.
pub fn is_not_modified(method: &Method, headers: &HeaderMap, freshness: &Freshness) -> bool {
    if method != Method::GET && method != Method::HEAD {
        return false;
    }

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH) {
        return if_none_match
            .to_str()
            .map(|value| etag_matches(value, &freshness.etag()))
            .unwrap_or(false);
    }

    let Some(modified) = freshness.last_modified else {
        return false;
    };
    let Some(since) = headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_http_date)
    else {
        return false;
    };

    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

/// Serve a JSON body, answering 304 when the client's copy is current.
pub fn serve_json(
    method: &Method,
    headers: &HeaderMap,
    freshness: &Freshness,
    body: Vec<u8>,
) -> Response {
    let mut response = if is_not_modified(method, headers, freshness) {
        StatusCode::NOT_MODIFIED.into_response()
    } else {
        (
            [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            body,
        )
            .into_response()
    };

    if let Some(modified) = freshness.last_modified {
        if let Ok(value) = HeaderValue::from_str(&http_date(modified)) {
            response.headers_mut().insert(header::LAST_MODIFIED, value);
        }
    }
    response
}
