//! Bearer verification: access token → Principal in request extensions.
//!
//! Reads `Authorization: Bearer <jwt>`, verifies it through `AuthService`
//! (signature, iss/aud/exp, `type == "access"`, subject still stored) and
//! inserts the resulting `Principal`. Anything else ends the request with 401
//! before any gate or handler runs.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::Authentication;
use crate::state::AppState;

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = bearer_token(req.headers()).map(str::to_owned) else {
        tracing::debug!(path = %req.uri().path(), "missing bearer token");
        return Err(AppError::Unauthorized);
    };

    let principal = match state.auth.authenticate(&token, state.users.as_ref()).await? {
        Authentication::Authenticated(principal) => principal,
        Authentication::Rejected(reason) => {
            tracing::warn!(%reason, "access token rejected");
            return Err(AppError::Unauthorized);
        }
    };

    // middleware → extractor handoff
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
