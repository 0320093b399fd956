use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use tracing::error;
use uuid::Uuid;

use crate::error::AppError;
use crate::services::auth::access_jwt::{ACCESS_TOKEN_TYPE, AccessTokenClaims};

/// Signs access tokens with the shared HS256 secret.
#[derive(Clone)]
pub struct JwtIssuer {
    issuer: String,
    audience: String,
    ttl_seconds: u64,
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for JwtIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIssuer")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl JwtIssuer {
    pub fn new(secret: &str, issuer: String, audience: String, ttl_seconds: u64) -> Self {
        Self {
            issuer,
            audience,
            ttl_seconds,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn issue_access_token(
        &self,
        user_id: Uuid,
        permission_level: i64,
    ) -> Result<String, AppError> {
        let now = Utc::now().timestamp().max(0) as u64;
        let claims = AccessTokenClaims {
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            sub: user_id.to_string(),
            exp: now.saturating_add(self.ttl_seconds),
            iat: Some(now),
            token_type: Some(ACCESS_TOKEN_TYPE.to_string()),
            permission_level,
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            AppError::Internal
        })
    }
}
