pub mod board;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /session                         current principal (auth required)
///
/// /boards                          list, create
/// /boards/{id}                     get, update, delete
/// /boards/{id}/download            canvas file export
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(handlers::session::get_session))
        .nest("/boards", board::router())
}
