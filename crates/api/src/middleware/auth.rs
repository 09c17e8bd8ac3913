//! Session extractor.
//!
//! Board handlers take [`AuthUser`] as their first argument. Its `owner_id`
//! is passed to every repository call, which is what keeps one principal's
//! boards invisible to another.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use inkboard_core::error::CoreError;
use inkboard_core::types::OwnerId;
use serde::Serialize;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Principal behind a valid `Authorization: Bearer <jwt>` header.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    #[serde(rename = "id")]
    pub owner_id: OwnerId,
    pub email: Option<String>,
    pub name: Option<String>,
}

fn unauthorized(reason: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(reason.to_string()))
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;
    let value = header
        .to_str()
        .map_err(|_| unauthorized("Authorization header is not valid text"))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized("Expected Authorization: Bearer <token>"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Session token rejected");
            unauthorized("Invalid or expired token")
        })?;
        if claims.sub.trim().is_empty() {
            return Err(unauthorized("Token has no subject"));
        }

        Ok(Self {
            owner_id: claims.sub,
            email: claims.email,
            name: claims.name,
        })
    }
}
