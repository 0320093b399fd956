//! In-process `UserStore` for router and gate tests.
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::user_repo::{NewUser, UniqueField, UserChanges, UserRecord, UserStore};

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    rows: Mutex<HashMap<Uuid, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed record (role and level included) and return its id.
    pub fn seed(&self, record: UserRecord) -> Uuid {
        let id = record.id;
        self.rows.lock().unwrap().insert(id, record);
        id
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn get(&self, id: Uuid) -> Option<UserRecord> {
        self.rows.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<UserRecord>> {
        let rows = self.rows.lock().unwrap();
        let mut all: Vec<UserRecord> = rows.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(all
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn create(&self, user: NewUser) -> RepoResult<UserRecord> {
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|r| r.email == user.email) {
            return Err(RepoError::Conflict);
        }
        let record = UserRecord {
            id: Uuid::new_v4(),
            first_name: user.first_name,
            last_name: user.last_name,
            age: user.age,
            email: user.email,
            password_hash: user.password_hash,
            role: "user".to_string(),
            permission_level: 1,
            created_at: Utc::now(),
        };
        rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn read_by_id(&self, id: Uuid) -> RepoResult<Option<UserRecord>> {
        Ok(self.get(id))
    }

    async fn read_by_field(
        &self,
        field: UniqueField,
        value: &str,
    ) -> RepoResult<Option<UserRecord>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .find(|r| match field {
                UniqueField::Email => r.email == value,
            })
            .cloned())
    }

    async fn update_by_id(&self, id: Uuid, changes: UserChanges) -> RepoResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.get_mut(&id) else {
            return Ok(false);
        };
        if let Some(email) = changes.email {
            row.email = email;
        }
        if let Some(hash) = changes.password_hash {
            row.password_hash = hash;
        }
        if let Some(first_name) = changes.first_name {
            row.first_name = Some(first_name);
        }
        if let Some(last_name) = changes.last_name {
            row.last_name = Some(last_name);
        }
        if let Some(age) = changes.age {
            row.age = Some(age);
        }
        if let Some(level) = changes.permission_level {
            row.permission_level = level;
        }
        Ok(true)
    }

    async fn delete_by_id(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }
}
