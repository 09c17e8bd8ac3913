//! Session introspection.

use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;

/// GET /api/v1/session
///
/// Return the principal behind the bearer token. Clients use this to gate
/// access before loading any board.
pub async fn get_session(user: AuthUser) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse { data: user }))
}
