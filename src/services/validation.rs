//! Pre-mutation checks against the store. Read-only: nothing here writes.
use uuid::Uuid;

use crate::error::AppError;
use crate::repos::{UniqueField, UserStore};

pub const EMAIL_TAKEN: &str = "User email already exists";
pub const INVALID_EMAIL: &str = "Invalid email";

/// One error per absent or blank field, in the order given.
pub fn require_fields(fields: &[(&'static str, Option<&str>)]) -> Result<(), AppError> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, value)| value.is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| format!("Missing required field: {name}"))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(missing))
    }
}

/// Create: no stored user may already use `email`.
pub async fn ensure_email_unused(users: &dyn UserStore, email: &str) -> Result<(), AppError> {
    match users.read_by_field(UniqueField::Email, email).await? {
        Some(_) => Err(AppError::validation(EMAIL_TAKEN)),
        None => Ok(()),
    }
}

/// Update: `email` must already belong to `target_id`, so emails cannot move between users.
pub async fn ensure_email_owned_by(
    users: &dyn UserStore,
    email: &str,
    target_id: Uuid,
) -> Result<(), AppError> {
    match users.read_by_field(UniqueField::Email, email).await? {
        Some(owner) if owner.id == target_id => Ok(()),
        _ => Err(AppError::validation(INVALID_EMAIL)),
    }
}
