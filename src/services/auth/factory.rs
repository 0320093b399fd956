/// Factory: build the token verifier and issuer from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AuthService, JwtIssuer};

pub fn build_auth_service(config: &Config) -> Arc<AuthService> {
    Arc::new(AuthService::new(
        &config.jwt_secret,
        &config.auth_issuer,
        &config.auth_audience,
        config.access_token_leeway_seconds,
    ))
}

pub fn build_token_issuer(config: &Config) -> Arc<JwtIssuer> {
    Arc::new(JwtIssuer::new(
        &config.jwt_secret,
        config.auth_issuer.clone(),
        config.auth_audience.clone(),
        config.access_token_ttl_seconds,
    ))
}
