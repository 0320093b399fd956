//! Ordered authorization pipeline for one route.
//!
//! Existence runs first (the ownership gates compare against the target's id),
//! then the pure gates in declaration order. The first failure ends the run.
use uuid::Uuid;

use crate::api::v1::extractors::Principal;
use crate::error::AppError;
use crate::repos::UserStore;
use crate::services::authz::gates::check_all;
use crate::services::authz::{Gate, RequestCtx, RoleRights};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    existing_target: bool,
    gates: Vec<Gate>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with 404 unless the `{user_id}` target is stored.
    pub fn require_existing_target(mut self) -> Self {
        self.existing_target = true;
        self
    }

    pub fn gate(mut self, gate: Gate) -> Self {
        self.gates.push(gate);
        self
    }

    pub async fn run(
        &self,
        users: &dyn UserStore,
        rights: &RoleRights,
        principal: &Principal,
        target_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        if self.existing_target {
            let Some(id) = target_id else {
                tracing::error!("existence gate on a route without a target id");
                return Err(AppError::Internal);
            };
            if users.read_by_id(id).await?.is_none() {
                return Err(AppError::user_not_found(id));
            }
        }

        let ctx = RequestCtx {
            principal,
            target_id,
        };
        check_all(&self.gates, &ctx, rights).map_err(|denial| {
            tracing::debug!(
                user_id = %principal.user_id(),
                target_id = ?target_id,
                ?denial,
                "request denied"
            );
            AppError::Forbidden
        })
    }
}
