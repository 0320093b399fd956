pub mod access_jwt;
pub mod factory;
pub mod jwt;

pub use access_jwt::{AuthService, Authentication, VerifiedAccessToken};
pub use factory::{build_auth_service, build_token_issuer};
pub use jwt::JwtIssuer;
