//! Session tokens.
//!
//! The identity provider signs HS256 JWTs with a secret it shares with this
//! server. The API never issues tokens in production; it only checks them and
//! reads the `sub` claim, which is the owner id of every board the caller
//! touches.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims read from a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Principal id, used as the board owner.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub exp: i64,
    pub iat: i64,
    #[serde(default)]
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Lifetime of tokens minted by [`generate_session_token`].
    pub token_expiry_mins: i64,
}

impl JwtConfig {
    /// `JWT_SECRET` is required and must be non-empty.
    /// `JWT_TOKEN_EXPIRY_MINS` defaults to 60.
    pub fn from_env() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.trim().is_empty() => s,
            _ => panic!("JWT_SECRET must be set to a non-empty value"),
        };
        let token_expiry_mins = crate::config::env_parse("JWT_TOKEN_EXPIRY_MINS", 60);

        Self {
            secret,
            token_expiry_mins,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

/// Sign a token for `sub`. Used by tests and local tooling that share the
/// provider's secret.
pub fn generate_session_token(
    sub: &str,
    email: Option<&str>,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let issued = Utc::now();
    let claims = Claims {
        sub: sub.to_owned(),
        email: email.map(str::to_owned),
        name: None,
        exp: (issued + Duration::minutes(config.token_expiry_mins)).timestamp(),
        iat: issued.timestamp(),
        jti: Uuid::now_v7().to_string(),
    };
    let key = EncodingKey::from_secret(config.secret.as_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
}

/// Check signature and expiry, then return the claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(config.secret.as_bytes());
    jsonwebtoken::decode::<Claims>(token, &key, &JwtConfig::validation()).map(|data| data.claims)
}
