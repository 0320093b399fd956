/*
 * Responsibility
 * - Load settings from the environment (DATABASE_URL, CORS allowlist, auth, thresholds)
 * - Validate values (missing required keys fail startup)
 */
use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    pub cors_allowed_origins: Vec<String>,

    pub jwt_secret: String,
    pub auth_issuer: String,
    pub auth_audience: String,
    pub access_token_ttl_seconds: u64,
    pub access_token_leeway_seconds: u64,

    // Permission levels must be strictly greater than these to pass.
    pub admin_permission_threshold: i64,
    pub paid_permission_threshold: i64,

    // PUT/PATCH may set `permissionLevel`; when true, a paid owner can raise their own
    // level past the admin threshold on the next sign-in.
    pub permission_self_update: bool,

    pub users_list_requires_auth: bool,
    pub users_page_size: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&lookup, "PORT", 3000)?;
        let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let auth_issuer = lookup("AUTH_ISSUER").unwrap_or_else(|| "user-api".to_string());
        let auth_audience = lookup("AUTH_AUDIENCE").unwrap_or_else(|| "user-api".to_string());

        let access_token_ttl_seconds = parse_or(&lookup, "ACCESS_TOKEN_TTL_SECONDS", 600)?; // 10 min
        let access_token_leeway_seconds = parse_or(&lookup, "ACCESS_TOKEN_LEEWAY_SECONDS", 60)?;

        let admin_permission_threshold = parse_or(&lookup, "ADMIN_PERMISSION_THRESHOLD", 4)?;
        let paid_permission_threshold = parse_or(&lookup, "PAID_PERMISSION_THRESHOLD", 1)?;

        let permission_self_update = parse_or(&lookup, "PERMISSION_SELF_UPDATE", true)?;

        let users_list_requires_auth = parse_or(&lookup, "USERS_LIST_REQUIRES_AUTH", false)?;
        let users_page_size: i64 = parse_or(&lookup, "USERS_PAGE_SIZE", 100)?;
        if users_page_size <= 0 {
            return Err(ConfigError::Invalid("USERS_PAGE_SIZE"));
        }

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            cors_allowed_origins,
            jwt_secret,
            auth_issuer,
            auth_audience,
            access_token_ttl_seconds,
            access_token_leeway_seconds,
            admin_permission_threshold,
            paid_permission_threshold,
            permission_self_update,
            users_list_requires_auth,
            users_page_size,
        })
    }
}

// Absent keys fall back to `default`; present but unparsable keys are an error.
fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_required_keys_are_set() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/users"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.auth_issuer, "user-api");
        assert_eq!(config.access_token_ttl_seconds, 600);
        assert_eq!(config.admin_permission_threshold, 4);
        assert_eq!(config.paid_permission_threshold, 1);
        assert!(config.permission_self_update);
        assert!(!config.users_list_requires_auth);
        assert_eq!(config.users_page_size, 100);
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn missing_secret_fails_startup() {
        let err = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn unparsable_threshold_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "secret"),
            ("PAID_PERMISSION_THRESHOLD", "paid"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("PAID_PERMISSION_THRESHOLD"));
    }

    #[test]
    fn production_env_and_origin_list_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "secret"),
            ("APP_ENV", "PROD"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
            ("USERS_LIST_REQUIRES_AUTH", "true"),
        ]))
        .unwrap();

        assert!(config.app_env.is_production());
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert!(config.users_list_requires_auth);
    }
}
