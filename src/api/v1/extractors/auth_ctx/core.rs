use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

use super::Principal;

/// Hands the verified Principal to a handler.
/// The access middleware must have inserted it into request extensions;
/// if it is missing (route not behind the middleware) the request is 401.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(Authenticated)
            .ok_or(AppError::Unauthorized)
    }
}
