/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 *   - users: the store, auth: token verifier, issuer: token signer, policy: role table + thresholds
 * - Cloned per request, so every field is an Arc
 */
use std::sync::Arc;

use crate::repos::UserStore;
use crate::services::auth::{AuthService, JwtIssuer};
use crate::services::authz::AccessPolicy;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub auth: Arc<AuthService>,
    pub issuer: Arc<JwtIssuer>,
    pub policy: Arc<AccessPolicy>,
    pub page_size: i64,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        auth: Arc<AuthService>,
        issuer: Arc<JwtIssuer>,
        policy: Arc<AccessPolicy>,
        page_size: i64,
    ) -> Self {
        Self {
            users,
            auth,
            issuer,
            policy,
            page_size,
        }
    }
}
