/*
 * Responsibility
 * - Take the `{user_id}` path segment and turn it into the target user's UUID
 * - Shared by the authorization middleware and the /users/{user_id} handlers
 *
 * A segment that is not a UUID names no stored user, so it is rejected the same
 * way a missing user is (404), not as a malformed request.
 */
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetUserId(pub Uuid);

impl<S> FromRequestParts<S> for TargetUserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Internal)?;

        Uuid::parse_str(&raw)
            .map(TargetUserId)
            .map_err(|_| AppError::user_not_found(&raw))
    }
}
