/*
 * Responsibility
 * - Terminal handlers for /users
 * - Bearer + gate checks already ran in middleware (see routes.rs); handlers do the
 *   body checks, hash passwords, and call the store
 */
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::users::{
            CreateUserRequest, CreatedResponse, ListUsersQuery, UpdateUserRequest, UserResponse,
        },
        extractors::{Authenticated, Principal, TargetUserId},
    },
    error::AppError,
    repos::NewUser,
    services::{password, validation},
    state::AppState,
};

pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let Query(query) = query.map_err(|e| AppError::validation(e.body_text()))?;
    let (limit, offset) = query.window(state.page_size);

    let rows = state.users.list(limit, offset).await?;

    Ok(Json(rows.into_iter().map(UserResponse::from).collect()))
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let Json(req) = payload?;

    validation::require_fields(&[
        ("email", req.email.as_deref()),
        ("password", req.password.as_deref()),
    ])?;
    req.validate().map_err(AppError::Validation)?;

    let email = req.email.unwrap_or_default();
    validation::ensure_email_unused(state.users.as_ref(), &email).await?;

    let password_hash = password::hash_password(req.password.unwrap_or_default()).await?;

    let row = state
        .users
        .create(NewUser {
            email,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
            age: req.age,
        })
        .await?;

    tracing::info!(user_id = %row.id, "user created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: row.id })))
}

pub async fn get_user(
    State(state): State<AppState>,
    TargetUserId(user_id): TargetUserId,
) -> Result<Json<UserResponse>, AppError> {
    let row = state
        .users
        .read_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::user_not_found(user_id))?;

    Ok(Json(row.into()))
}

pub async fn replace_user(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    TargetUserId(user_id): TargetUserId,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(req) = payload?;
    req.validate_replace().map_err(AppError::Validation)?;

    apply_update(&state, &principal, user_id, req).await
}

pub async fn patch_user(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    TargetUserId(user_id): TargetUserId,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(req) = payload?;
    req.validate_patch().map_err(AppError::Validation)?;

    apply_update(&state, &principal, user_id, req).await
}

pub async fn delete_user(
    State(state): State<AppState>,
    TargetUserId(user_id): TargetUserId,
) -> Result<StatusCode, AppError> {
    if state.users.delete_by_id(user_id).await? {
        tracing::info!(%user_id, "user deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::user_not_found(user_id))
    }
}

async fn apply_update(
    state: &AppState,
    principal: &Principal,
    user_id: Uuid,
    mut req: UpdateUserRequest,
) -> Result<StatusCode, AppError> {
    if let Some(email) = req.email.as_deref() {
        validation::ensure_email_owned_by(state.users.as_ref(), email, user_id).await?;
    }

    // With PERMISSION_SELF_UPDATE on (the default) an owner may raise their own level.
    if let Some(requested) = req.permission_level
        && !state.policy.permission_self_update
    {
        let current = state
            .users
            .read_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::user_not_found(user_id))?
            .permission_level;
        if !state
            .policy
            .may_change_permission_level(principal, current, requested)
        {
            tracing::debug!(
                user_id = %principal.user_id(),
                target_id = %user_id,
                current,
                requested,
                "permission level change denied"
            );
            return Err(AppError::Forbidden);
        }
    }

    let password_hash = match req.password.take() {
        Some(plain) => Some(password::hash_password(plain).await?),
        None => None,
    };

    // the row can vanish between the existence gate and here
    if state
        .users
        .update_by_id(user_id, req.into_changes(password_hash))
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::user_not_found(user_id))
    }
}
