/*
 * Responsibility
 * - Request extractors shared by v1 handlers and middleware
 */
mod auth_ctx;
mod target_id;

pub use auth_ctx::{Authenticated, Principal};
pub use target_id::TargetUserId;
