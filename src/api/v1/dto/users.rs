/*
 * Responsibility
 * - Users request/response DTOs
 * - Shape checks (validate) run before any store-backed validation
 * - Responses never expose the password hash
 */
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::repos::{UserChanges, UserRecord};

const MIN_PASSWORD_LEN: usize = 5;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default, deserialize_with = "trimmed")]
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
}

impl CreateUserRequest {
    /// Rules for the optional fields that are present; presence is checked separately.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        into_result(shape_errors(
            self.email.as_deref(),
            self.password.as_deref(),
            self.age,
        ))
    }
}

/// Body for both PUT (replace, required fields enforced) and PATCH (everything optional).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "trimmed")]
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub permission_level: Option<i64>,
}

impl UpdateUserRequest {
    pub fn validate_replace(&self) -> Result<(), Vec<String>> {
        let mut errors: Vec<String> = [
            ("email is required", self.email.is_some()),
            ("Must include password (5+ characters)", self.password.is_some()),
            ("firstName is required", self.first_name.is_some()),
            ("lastName is required", self.last_name.is_some()),
            ("permissionLevel is required", self.permission_level.is_some()),
        ]
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(message, _)| message.to_string())
        .collect();

        errors.extend(self.shape_errors());
        into_result(errors)
    }

    pub fn validate_patch(&self) -> Result<(), Vec<String>> {
        into_result(self.shape_errors())
    }

    fn shape_errors(&self) -> Vec<String> {
        shape_errors(self.email.as_deref(), self.password.as_deref(), self.age)
    }

    /// Column changes; `password_hash` replaces the plaintext password.
    pub fn into_changes(self, password_hash: Option<String>) -> UserChanges {
        UserChanges {
            email: self.email,
            password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            permission_level: self.permission_level,
        }
    }
}

// Rules for fields that are present, shared by create, replace and patch.
fn shape_errors(email: Option<&str>, password: Option<&str>, age: Option<i32>) -> Vec<String> {
    let mut errors = Vec::new();
    if let Some(email) = email
        && !is_email(email)
    {
        errors.push("email must be a valid email address".to_string());
    }
    if let Some(password) = password
        && password.chars().count() < MIN_PASSWORD_LEN
    {
        errors.push("Password must be 5+ characters".to_string());
    }
    if let Some(age) = age
        && age < 0
    {
        errors.push("age must be >= 0".to_string());
    }
    errors
}

/// Emails are compared and stored without surrounding whitespace.
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(|s| s.trim().to_string()))
}

fn into_result(errors: Vec<String>) -> Result<(), Vec<String>> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

// local@domain.tld, no whitespace
fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

impl ListUsersQuery {
    /// `(limit, offset)` with limit clamped to `1..=max_limit` and page to `>= 0`.
    pub fn window(&self, max_limit: i64) -> (i64, i64) {
        let limit = self.limit.unwrap_or(max_limit).clamp(1, max_limit);
        let page = self.page.unwrap_or(0).max(0);
        (limit, page.saturating_mul(limit))
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub email: String,
    pub role: String,
    pub permission_level: i64,
}

impl From<UserRecord> for UserResponse {
    fn from(row: UserRecord) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            age: row.age,
            email: row.email,
            role: row.role,
            permission_level: row.permission_level,
        }
    }
}
