//! Route guards: bearer verification followed by the route's gate pipeline.
//!
//! Usage:
//! ```ignore
//! let read = Pipeline::new().require_existing_target().gate(policy.owner_or_admin());
//! .route("/users/{user_id}", protect(get(get_user), &state, Target::PathUser, read))
//! ```
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::v1::extractors::{Authenticated, TargetUserId};
use crate::error::AppError;
use crate::middleware::auth::access::access_middleware;
use crate::services::authz::Pipeline;
use crate::state::AppState;

/// What the gates compare the Principal against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// `{user_id}` path segment
    PathUser,
    /// collection route, no target
    Collection,
}

#[derive(Clone)]
struct GuardState {
    app: AppState,
    target: Target,
    pipeline: Arc<Pipeline>,
}

/// Wrap `route` so that it runs: bearer verification → `pipeline` → handler.
pub fn protect(
    route: MethodRouter<AppState>,
    state: &AppState,
    target: Target,
    pipeline: Pipeline,
) -> MethodRouter<AppState> {
    let guard = GuardState {
        app: state.clone(),
        target,
        pipeline: Arc::new(pipeline),
    };

    // The last route_layer is the outermost, so verification runs first.
    route
        .route_layer(middleware::from_fn_with_state(guard, authorize_middleware))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            access_middleware,
        ))
}

async fn authorize_middleware(
    State(guard): State<GuardState>,
    Authenticated(principal): Authenticated,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let target_id = match guard.target {
        Target::PathUser => Some(TargetUserId::from_request_parts(&mut parts, &guard).await?.0),
        Target::Collection => None,
    };

    guard
        .pipeline
        .run(
            guard.app.users.as_ref(),
            &guard.app.policy.rights,
            &principal,
            target_id,
        )
        .await?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}
