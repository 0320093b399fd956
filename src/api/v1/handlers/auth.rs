use axum::Json;
use axum::extract::{State, rejection::JsonRejection};

use crate::api::v1::dto::auth::{TokenRequest, TokenResponse};
use crate::error::AppError;
use crate::repos::UniqueField;
use crate::services::{password, validation};
use crate::state::AppState;

/// Exchange email + password for an access token.
pub async fn issue_token(
    State(state): State<AppState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(req) = payload?;
    validation::require_fields(&[
        ("email", req.email.as_deref()),
        ("password", req.password.as_deref()),
    ])?;
    let email = req.email.unwrap_or_default();

    let Some(user) = state
        .users
        .read_by_field(UniqueField::Email, &email)
        .await?
    else {
        tracing::debug!("token requested for unknown email");
        return Err(AppError::Unauthorized);
    };

    let matches =
        password::verify_password(req.password.unwrap_or_default(), user.password_hash).await?;
    if !matches {
        tracing::warn!(user_id = %user.id, "token requested with wrong password");
        return Err(AppError::Unauthorized);
    }

    let access_token = state
        .issuer
        .issue_access_token(user.id, user.permission_level)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.issuer.ttl_seconds(),
    }))
}
