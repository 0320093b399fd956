//! Pure authorization gates.
//!
//! Each gate looks only at the request context, the Principal and static config,
//! so it can be checked without a server or a store. Store-backed checks
//! (target existence) live in `pipeline`.
use uuid::Uuid;

use crate::api::v1::extractors::Principal;
use crate::services::authz::roles::{Right, RoleRights};

/// Typed per-request context the gates evaluate.
#[derive(Debug, Clone, Copy)]
pub struct RequestCtx<'a> {
    pub principal: &'a Principal,
    /// `{user_id}` from the path, when the route has one.
    pub target_id: Option<Uuid>,
}

impl RequestCtx<'_> {
    fn acts_on_self(&self) -> bool {
        self.target_id == Some(self.principal.user_id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Principal is the target user, or its level is above `admin_threshold`.
    OwnerOrAdmin { admin_threshold: i64 },
    /// Principal's level is strictly above the threshold.
    MinPermissionLevel(i64),
    /// Principal's role holds every listed right, or the principal is the target user.
    Rights(Vec<Right>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    NotOwnerOrAdmin,
    PermissionLevelTooLow { required_above: i64, actual: i64 },
    MissingRights(Vec<Right>),
}

impl Gate {
    pub fn check(&self, ctx: &RequestCtx<'_>, rights: &RoleRights) -> Result<(), Denial> {
        let level = ctx.principal.permission_level();
        match self {
            Gate::OwnerOrAdmin { admin_threshold } => {
                if ctx.acts_on_self() || level > *admin_threshold {
                    Ok(())
                } else {
                    Err(Denial::NotOwnerOrAdmin)
                }
            }
            Gate::MinPermissionLevel(threshold) => {
                if level > *threshold {
                    Ok(())
                } else {
                    Err(Denial::PermissionLevelTooLow {
                        required_above: *threshold,
                        actual: level,
                    })
                }
            }
            Gate::Rights(required) => {
                if rights.has_all(ctx.principal.role(), required) || ctx.acts_on_self() {
                    Ok(())
                } else {
                    let granted = rights.rights(ctx.principal.role());
                    Err(Denial::MissingRights(
                        required
                            .iter()
                            .filter(|r| !granted.contains(r))
                            .copied()
                            .collect(),
                    ))
                }
            }
        }
    }
}

/// Run gates in order; the first denial wins.
pub fn check_all(gates: &[Gate], ctx: &RequestCtx<'_>, rights: &RoleRights) -> Result<(), Denial> {
    gates.iter().try_for_each(|gate| gate.check(ctx, rights))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::principal;

    const ADMIN_ABOVE: i64 = 4;

    fn owner_or_admin() -> Gate {
        Gate::OwnerOrAdmin {
            admin_threshold: ADMIN_ABOVE,
        }
    }

    #[test]
    fn owner_passes_at_any_level() {
        let rights = RoleRights::default();
        for level in [i64::MIN, -1, 0, 1, ADMIN_ABOVE, 100] {
            let me = principal(Uuid::new_v4(), "user", level);
            let ctx = RequestCtx {
                principal: &me,
                target_id: Some(me.user_id()),
            };
            assert_eq!(owner_or_admin().check(&ctx, &rights), Ok(()), "level {level}");
        }
    }

    #[test]
    fn non_owner_at_or_below_admin_threshold_is_denied() {
        let rights = RoleRights::default();
        for level in [0, 1, ADMIN_ABOVE] {
            let me = principal(Uuid::new_v4(), "admin", level);
            let ctx = RequestCtx {
                principal: &me,
                target_id: Some(Uuid::new_v4()),
            };
            assert_eq!(
                owner_or_admin().check(&ctx, &rights),
                Err(Denial::NotOwnerOrAdmin),
                "level {level}"
            );
        }
    }

    #[test]
    fn level_above_admin_threshold_acts_on_anyone() {
        let rights = RoleRights::default();
        let admin = principal(Uuid::new_v4(), "user", ADMIN_ABOVE + 1);
        let ctx = RequestCtx {
            principal: &admin,
            target_id: Some(Uuid::new_v4()),
        };
        assert_eq!(owner_or_admin().check(&ctx, &rights), Ok(()));
    }

    #[test]
    fn min_level_is_strictly_greater() {
        let rights = RoleRights::default();
        let gate = Gate::MinPermissionLevel(1);

        let at = principal(Uuid::new_v4(), "user", 1);
        let ctx = RequestCtx {
            principal: &at,
            target_id: None,
        };
        assert_eq!(
            gate.check(&ctx, &rights),
            Err(Denial::PermissionLevelTooLow {
                required_above: 1,
                actual: 1
            })
        );

        let above = principal(Uuid::new_v4(), "user", 2);
        let ctx = RequestCtx {
            principal: &above,
            target_id: None,
        };
        assert_eq!(gate.check(&ctx, &rights), Ok(()));
    }

    #[test]
    fn rights_gate_checks_role_table_or_self() {
        let rights = RoleRights::default();
        let gate = Gate::Rights(vec![Right::GetUsers, Right::ManageUsers]);

        let admin = principal(Uuid::new_v4(), "admin", 0);
        let ctx = RequestCtx {
            principal: &admin,
            target_id: Some(Uuid::new_v4()),
        };
        assert_eq!(gate.check(&ctx, &rights), Ok(()));

        let user = principal(Uuid::new_v4(), "user", 100);
        let other = RequestCtx {
            principal: &user,
            target_id: Some(Uuid::new_v4()),
        };
        assert_eq!(
            gate.check(&other, &rights),
            Err(Denial::MissingRights(vec![Right::GetUsers, Right::ManageUsers]))
        );

        let own = RequestCtx {
            principal: &user,
            target_id: Some(user.user_id()),
        };
        assert_eq!(gate.check(&own, &rights), Ok(()));
    }

    #[test]
    fn check_all_stops_at_first_denial() {
        let rights = RoleRights::default();
        let me = principal(Uuid::new_v4(), "user", 0);
        let ctx = RequestCtx {
            principal: &me,
            target_id: Some(Uuid::new_v4()),
        };
        let gates = [owner_or_admin(), Gate::MinPermissionLevel(1)];

        assert_eq!(
            check_all(&gates, &ctx, &rights),
            Err(Denial::NotOwnerOrAdmin)
        );
        assert_eq!(check_all(&[], &ctx, &rights), Ok(()));
    }
}
