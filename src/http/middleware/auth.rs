use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Credentials submitted with HTTP Basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Extract Basic credentials from the `Authorization` header.
///
/// Returns `None` when the header is absent, uses another scheme, or does not
/// decode to `username:password`.
pub fn basic_credentials(headers: &HeaderMap) -> Option<BasicCredentials> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Require the Basic credentials configured in the broker definition.
///
/// The expected pair is read through the config store on every request, so
/// an unreadable definition fails with 500 instead of locking everyone out
/// with 401.
pub async fn require_basic_auth(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let credentials = basic_credentials(request.headers())
        .filter(|c| !c.username.trim().is_empty() && !c.password.trim().is_empty())
        .ok_or(ApiError::Unauthorized)?;

    let config = state.config().await?;
    if !config
        .server
        .basic_auth
        .matches(&credentials.username, &credentials.password)
    {
        tracing::warn!(username = %credentials.username, "Basic auth rejected");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}
