/*
 * Responsibility
 * - Persistence boundary (UserStore trait + implementations)
 */
pub mod error;
#[cfg(test)]
pub mod memory;
pub mod user_repo;

pub use error::{RepoError, RepoResult};
pub use user_repo::{NewUser, PgUserStore, UniqueField, UserChanges, UserRecord, UserStore};
#[cfg(test)]
pub use user_repo::MockUserStore;
