/*
 * Responsibility
 * - v1 URL structure
 * - Binds each (verb, path) to its pipeline: bearer → gates → handler (body checks inside)
 */
use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::api::v1::handlers::{
    auth::issue_token,
    fallback::method_not_allowed,
    health::health,
    users::{create_user, delete_user, get_user, list_users, patch_user, replace_user},
};
use crate::middleware::auth::{Target, protect};
use crate::services::authz::{Gate, Pipeline, Right};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let policy = &state.policy;

    let owner_or_admin = || {
        Pipeline::new()
            .require_existing_target()
            .gate(policy.owner_or_admin())
    };
    let paid_owner_or_admin = || owner_or_admin().gate(policy.paid_member());

    let list = if policy.list_requires_auth {
        protect(
            get(list_users),
            state,
            Target::Collection,
            Pipeline::new().gate(Gate::Rights(vec![Right::GetUsers])),
        )
    } else {
        get(list_users)
    };

    Router::new()
        .route("/health", get(health))
        .route("/auth/token", post(issue_token))
        .route("/users", list)
        .route("/users", post(create_user))
        .route(
            "/users/{user_id}",
            protect(get(get_user), state, Target::PathUser, owner_or_admin()),
        )
        .route(
            "/users/{user_id}",
            protect(put(replace_user), state, Target::PathUser, paid_owner_or_admin()),
        )
        .route(
            "/users/{user_id}",
            protect(patch(patch_user), state, Target::PathUser, paid_owner_or_admin()),
        )
        .route(
            "/users/{user_id}",
            protect(delete(delete_user), state, Target::PathUser, owner_or_admin()),
        )
        .method_not_allowed_fallback(method_not_allowed)
}
