use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::api::v1::extractors::Principal;
use crate::repos::{RepoResult, UserStore};

/// Value of the `type` claim on tokens that may call the API.
pub const ACCESS_TOKEN_TYPE: &str = "access";

// Errors returned by access-token verification + strict claim validation.
#[derive(Debug, Error)]
pub enum AccessJwtError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
    #[error("invalid 'sub' (expected UUID)")]
    InvalidSubUuid,
    #[error("unexpected token type {0:?}")]
    WrongTokenType(Option<String>),
}

/// Access token (JWT) claims. Shared by the issuer and the verifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub iss: String,
    pub aud: String,
    pub sub: String,
    pub exp: u64,
    #[serde(default)]
    pub iat: Option<u64>,

    #[serde(rename = "type", default)]
    pub token_type: Option<String>,
    pub permission_level: i64,
}

/// What `AuthService` returns once signature and claims check out.
///
/// - `sub` is promoted to `Uuid` (project convention)
/// - `iss/aud/exp` were already checked by `verify_strict`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccessToken {
    pub user_id: Uuid,
    pub permission_level: i64,
}

/// Why a credential did not produce a Principal.
#[derive(Debug)]
pub enum Rejection {
    Credential(AccessJwtError),
    UserMissing(Uuid),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Credential(e) => write!(f, "{}", e),
            Rejection::UserMissing(id) => write!(f, "user {} no longer exists", id),
        }
    }
}

/// Outcome of bearer authentication. There is no partial state.
#[derive(Debug)]
pub enum Authentication {
    Authenticated(Principal),
    Rejected(Rejection),
}

/// HS256 access-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("AuthService")
            .field("validation", &self.validation)
            .finish()
    }
}

impl AuthService {
    pub fn new(secret: &str, issuer: &str, audience: &str, leeway_seconds: u64) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.leeway = leeway_seconds;

        Self {
            decoding_key,
            validation,
        }
    }

    // Verify and decode a JWT access token.
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, jsonwebtoken::errors::Error> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }

    /// Verify + strict claim validation.
    ///
    /// `jsonwebtoken::Validation` already checks the signature, `exp`, `iss` and `aud`.
    /// This additionally requires a non-empty UUID `sub` and `type == "access"`.
    pub fn verify_verified(&self, token: &str) -> Result<VerifiedAccessToken, AccessJwtError> {
        let claims = self.verify(token)?;

        if claims.sub.trim().is_empty() {
            return Err(AccessJwtError::EmptyClaim("sub"));
        }
        if claims.token_type.as_deref() != Some(ACCESS_TOKEN_TYPE) {
            return Err(AccessJwtError::WrongTokenType(claims.token_type));
        }
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AccessJwtError::InvalidSubUuid)?;

        Ok(VerifiedAccessToken {
            user_id,
            permission_level: claims.permission_level,
        })
    }

    /// Resolve a bearer token to a Principal.
    ///
    /// `Err` is reserved for store failures; every credential problem, including a
    /// subject that has since been deleted, is `Ok(Authentication::Rejected(_))`.
    pub async fn authenticate(
        &self,
        token: &str,
        users: &dyn UserStore,
    ) -> RepoResult<Authentication> {
        let verified = match self.verify_verified(token) {
            Ok(v) => v,
            Err(e) => return Ok(Authentication::Rejected(Rejection::Credential(e))),
        };

        let Some(user) = users.read_by_id(verified.user_id).await? else {
            return Ok(Authentication::Rejected(Rejection::UserMissing(
                verified.user_id,
            )));
        };

        Ok(Authentication::Authenticated(Principal::from_verified(
            &verified, user.role,
        )))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header};

    use super::*;
    use crate::repos::memory::MemoryUserStore;
    use crate::test_support::{SECRET, TestUser};

    fn service() -> AuthService {
        AuthService::new(SECRET, "user-api", "user-api", 0)
    }

    fn sign(claims: &AccessTokenClaims, secret: &str) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims_for(user_id: Uuid) -> AccessTokenClaims {
        let now = Utc::now().timestamp() as u64;
        AccessTokenClaims {
            iss: "user-api".into(),
            aud: "user-api".into(),
            sub: user_id.to_string(),
            exp: now + 600,
            iat: Some(now),
            token_type: Some(ACCESS_TOKEN_TYPE.into()),
            permission_level: 2,
        }
    }

    #[tokio::test]
    async fn valid_token_yields_principal_with_stored_role() {
        let store = MemoryUserStore::new();
        let id = store.seed(TestUser::new("admin@x.com").role("admin").build());

        let token = sign(&claims_for(id), SECRET);
        let outcome = service().authenticate(&token, &store).await.unwrap();

        let Authentication::Authenticated(principal) = outcome else {
            panic!("expected authenticated, got {outcome:?}");
        };
        assert_eq!(principal.user_id(), id);
        assert_eq!(principal.role(), "admin");
        assert_eq!(principal.permission_level(), 2);
    }

    #[tokio::test]
    async fn vanished_user_is_rejected() {
        let store = MemoryUserStore::new();
        let token = sign(&claims_for(Uuid::new_v4()), SECRET);

        let outcome = service().authenticate(&token, &store).await.unwrap();
        assert!(matches!(
            outcome,
            Authentication::Rejected(Rejection::UserMissing(_))
        ));
    }

    #[test]
    fn refresh_type_token_is_rejected() {
        let mut claims = claims_for(Uuid::new_v4());
        claims.token_type = Some("refresh".into());

        let err = service().verify_verified(&sign(&claims, SECRET)).unwrap_err();
        assert!(matches!(err, AccessJwtError::WrongTokenType(Some(_))));
    }

    #[test]
    fn missing_type_claim_is_rejected() {
        let mut claims = claims_for(Uuid::new_v4());
        claims.token_type = None;

        let err = service().verify_verified(&sign(&claims, SECRET)).unwrap_err();
        assert!(matches!(err, AccessJwtError::WrongTokenType(None)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = claims_for(Uuid::new_v4());
        claims.exp = Utc::now().timestamp() as u64 - 3600;

        let err = service().verify_verified(&sign(&claims, SECRET)).unwrap_err();
        assert!(matches!(err, AccessJwtError::Jwt(_)));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let claims = claims_for(Uuid::new_v4());
        let err = service()
            .verify_verified(&sign(&claims, "some-other-secret"))
            .unwrap_err();
        assert!(matches!(err, AccessJwtError::Jwt(_)));
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let mut claims = claims_for(Uuid::new_v4());
        claims.aud = "another-api".into();

        assert!(service().verify_verified(&sign(&claims, SECRET)).is_err());
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let mut claims = claims_for(Uuid::new_v4());
        claims.sub = "alice".into();

        let err = service().verify_verified(&sign(&claims, SECRET)).unwrap_err();
        assert!(matches!(err, AccessJwtError::InvalidSubUuid));
    }

    #[test]
    fn malformed_token_is_rejected() {
        assert!(service().verify_verified("not.a.jwt").is_err());
    }
}
