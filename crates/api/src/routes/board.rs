//! Route definitions for board documents.

use axum::routing::get;
use axum::Router;

use crate::handlers::board;
use crate::state::AppState;

/// Board routes mounted at `/boards`.
///
/// ```text
/// GET    /               -> list_boards
/// POST   /               -> create_board
/// GET    /{id}           -> get_board
/// PUT    /{id}           -> update_board
/// DELETE /{id}           -> delete_board
/// GET    /{id}/download  -> download_board
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(board::list_boards).post(board::create_board))
        .route(
            "/{id}",
            get(board::get_board)
                .put(board::update_board)
                .delete(board::delete_board),
        )
        .route("/{id}/download", get(board::download_board))
}
