/*
 * Responsibility
 * - Authorization: role table, gates, per-route pipelines
 * - AccessPolicy bundles the immutable pieces built from Config at startup
 */
pub mod gates;
pub mod pipeline;
pub mod roles;

pub use gates::{Gate, RequestCtx};
pub use pipeline::Pipeline;
pub use roles::{Right, RoleRights};

use crate::api::v1::extractors::Principal;
use crate::config::Config;

#[derive(Debug, Clone)]
pub struct AccessPolicy {
    pub rights: RoleRights,
    pub admin_threshold: i64,
    pub paid_threshold: i64,
    pub list_requires_auth: bool,
    pub permission_self_update: bool,
}

impl AccessPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            rights: RoleRights::default(),
            admin_threshold: config.admin_permission_threshold,
            paid_threshold: config.paid_permission_threshold,
            list_requires_auth: config.users_list_requires_auth,
            permission_self_update: config.permission_self_update,
        }
    }

    pub fn owner_or_admin(&self) -> Gate {
        Gate::OwnerOrAdmin {
            admin_threshold: self.admin_threshold,
        }
    }

    pub fn paid_member(&self) -> Gate {
        Gate::MinPermissionLevel(self.paid_threshold)
    }

    /// Whether `principal` may move a stored level from `current` to `requested`.
    /// Admins always may; others only when self-service level changes are enabled.
    pub fn may_change_permission_level(
        &self,
        principal: &Principal,
        current: i64,
        requested: i64,
    ) -> bool {
        self.permission_self_update
            || requested == current
            || principal.permission_level() > self.admin_threshold
    }
}
