//! Shared fixtures for unit and router tests.
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::api::v1::extractors::Principal;
use crate::app::{build_router, build_state};
use crate::config::Config;
use crate::repos::{UserRecord, UserStore, memory::MemoryUserStore};
use crate::services::auth::{JwtIssuer, VerifiedAccessToken};

pub const SECRET: &str = "test-secret-that-is-long-enough";

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://localhost/user_api_test".to_string()),
        "JWT_SECRET" => Some(SECRET.to_string()),
        _ => None,
    })
    .expect("test config")
}

pub fn principal(user_id: Uuid, role: &str, permission_level: i64) -> Principal {
    let token = VerifiedAccessToken {
        user_id,
        permission_level,
    };
    Principal::from_verified(&token, role)
}

/// Builder for stored users; defaults to a plain `user` at level 1.
pub struct TestUser {
    record: UserRecord,
}

impl TestUser {
    pub fn new(email: &str) -> Self {
        Self {
            record: UserRecord {
                id: Uuid::new_v4(),
                first_name: Some("Test".to_string()),
                last_name: Some("User".to_string()),
                age: None,
                email: email.to_string(),
                password_hash: "not-a-real-hash".to_string(),
                role: "user".to_string(),
                permission_level: 1,
                created_at: Utc::now(),
            },
        }
    }

    pub fn role(mut self, role: &str) -> Self {
        self.record.role = role.to_string();
        self
    }

    pub fn level(mut self, level: i64) -> Self {
        self.record.permission_level = level;
        self
    }

    pub fn password_hash(mut self, hash: String) -> Self {
        self.record.password_hash = hash;
        self
    }

    pub fn build(self) -> UserRecord {
        self.record
    }
}

/// Full router over an in-memory store, plus a token minter bound to the same secret.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryUserStore>,
    issuer: JwtIssuer,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let store = Arc::new(MemoryUserStore::new());
        let users: Arc<dyn UserStore> = store.clone();
        Self::build(config, users, store)
    }

    /// Router over an arbitrary store (e.g. a mock); `self.store` stays empty.
    pub fn with_users(config: Config, users: Arc<dyn UserStore>) -> Self {
        Self::build(config, users, Arc::new(MemoryUserStore::new()))
    }

    fn build(config: Config, users: Arc<dyn UserStore>, store: Arc<MemoryUserStore>) -> Self {
        let issuer = JwtIssuer::new(
            &config.jwt_secret,
            config.auth_issuer.clone(),
            config.auth_audience.clone(),
            config.access_token_ttl_seconds,
        );
        let state = build_state(&config, users);
        Self {
            router: build_router(state, &config),
            store,
            issuer,
        }
    }

    pub fn token_for(&self, user_id: Uuid, permission_level: i64) -> String {
        self.issuer
            .issue_access_token(user_id, permission_level)
            .expect("sign test token")
    }

    /// Seed a user and return its id with a token carrying its stored level.
    pub fn seed(&self, user: TestUser) -> (Uuid, String) {
        let record = user.build();
        let level = record.permission_level;
        let id = self.store.seed(record);
        (id, self.token_for(id, level))
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let res = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("router is infallible");

        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }
}
