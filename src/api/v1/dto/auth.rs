use serde::{Deserialize, Serialize};

/// Body for `POST /auth/token`.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default, deserialize_with = "super::users::trimmed")]
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always "Bearer"
    pub token_type: &'static str,
    /// Seconds until expiry.
    pub expires_in: u64,
}
