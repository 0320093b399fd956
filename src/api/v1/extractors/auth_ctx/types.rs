/*
 * Responsibility
 * - The authenticated identity handlers and gates see (Principal)
 * - The access middleware verifies the credential and stores it in request extensions;
 *   handlers only ever receive this type
 *
 * Notes
 * - Fields are private: the only constructor takes a VerifiedAccessToken, so a Principal
 *   cannot exist for a credential that did not pass verification
 */
use uuid::Uuid;

use crate::services::auth::VerifiedAccessToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user_id: Uuid,
    role: String,
    permission_level: i64,
}

impl Principal {
    /// `role` comes from the stored user; the permission level comes from the token.
    pub fn from_verified(token: &VerifiedAccessToken, role: impl Into<String>) -> Self {
        Self {
            user_id: token.user_id,
            role: role.into(),
            permission_level: token.permission_level,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn permission_level(&self) -> i64 {
        self.permission_level
    }
}
