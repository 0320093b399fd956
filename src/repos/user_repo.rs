/*
 * Responsibility
 * - The CRUD contract the handlers and gates rely on (UserStore)
 * - SQLx implementation against the `users` table (PgUserStore)
 * - DB errors are returned as RepoError so the API layer can map them
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    #[sqlx(rename = "firstName")]
    pub first_name: Option<String>,
    #[sqlx(rename = "lastName")]
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub email: String,
    // argon2 PHC string, never the plaintext
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub role: String,
    #[sqlx(rename = "permissionLevel")]
    pub permission_level: i64,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
}

/// Column changes for replace/patch. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub permission_level: Option<i64>,
}

/// Columns that can be looked up by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<UserRecord>>;

    async fn create(&self, user: NewUser) -> RepoResult<UserRecord>;

    async fn read_by_id(&self, id: Uuid) -> RepoResult<Option<UserRecord>>;

    async fn read_by_field(&self, field: UniqueField, value: &str)
    -> RepoResult<Option<UserRecord>>;

    /// Returns `false` when no row matched.
    async fn update_by_id(&self, id: Uuid, changes: UserChanges) -> RepoResult<bool>;

    /// Returns `false` when no row matched.
    async fn delete_by_id(&self, id: Uuid) -> RepoResult<bool>;
}

const USER_COLUMNS: &str = r#""userId", "firstName", "lastName", age, email, password, role, "permissionLevel", "createdAt""#;

#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<UserRecord>> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            ORDER BY "createdAt" DESC
            LIMIT $1 OFFSET $2
            "#
        );
        let rows = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn create(&self, user: NewUser) -> RepoResult<UserRecord> {
        let sql = format!(
            r#"
            INSERT INTO users (email, password, "firstName", "lastName", age)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.first_name.as_deref())
            .bind(user.last_name.as_deref())
            .bind(user.age)
            .fetch_one(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn read_by_id(&self, id: Uuid) -> RepoResult<Option<UserRecord>> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE "userId" = $1
            "#
        );
        let row = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn read_by_field(
        &self,
        field: UniqueField,
        value: &str,
    ) -> RepoResult<Option<UserRecord>> {
        let column = match field {
            UniqueField::Email => "email",
        };
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE {column} = $1
            "#
        );
        let row = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn update_by_id(&self, id: Uuid, changes: UserChanges) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET
                email = COALESCE($2, email),
                password = COALESCE($3, password),
                "firstName" = COALESCE($4, "firstName"),
                "lastName" = COALESCE($5, "lastName"),
                age = COALESCE($6, age),
                "permissionLevel" = COALESCE($7, "permissionLevel")
            WHERE "userId" = $1
            "#,
        )
        .bind(id)
        .bind(changes.email.as_deref())
        .bind(changes.password_hash.as_deref())
        .bind(changes.first_name.as_deref())
        .bind(changes.last_name.as_deref())
        .bind(changes.age)
        .bind(changes.permission_level)
        .execute(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE "userId" = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
