//! Handlers for board documents.
//!
//! Every handler is scoped to the session principal: boards owned by
//! someone else are reported as not found.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use inkboard_core::board::{
    normalize_title, BoardPatch, BoardUpdated, CreateBoard, CreatedBoard, BOARD_ENTITY,
};
use inkboard_core::error::CoreError;
use inkboard_core::export::{canvas_file, download_filename, CANVAS_FILE_MIME};
use inkboard_core::types::BoardId;
use inkboard_db::repositories::BoardRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: BoardId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: BOARD_ENTITY,
        id: id.to_string(),
    })
}

/// GET /api/v1/boards
///
/// List the caller's boards, most recently updated first.
pub async fn list_boards(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let boards = BoardRepo::list(&state.pool, &user.owner_id).await?;

    Ok(Json(DataResponse { data: boards }))
}

/// GET /api/v1/boards/{id}
pub async fn get_board(
    user: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<BoardId>,
) -> AppResult<impl IntoResponse> {
    let board = BoardRepo::find_by_id(&state.pool, board_id, &user.owner_id)
        .await?
        .ok_or_else(|| not_found(board_id))?;

    Ok(Json(DataResponse { data: board }))
}

/// POST /api/v1/boards
///
/// Create an empty board. The title is optional and defaults to `Untitled`.
pub async fn create_board(
    user: AuthUser,
    State(state): State<AppState>,
    body: Result<Json<CreateBoard>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = body?;
    let title = input
        .title
        .as_deref()
        .map(normalize_title)
        .transpose()
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let board = BoardRepo::create(&state.pool, &user.owner_id, title.as_deref()).await?;

    tracing::info!(
        board_id = %board.id,
        owner_id = %user.owner_id,
        title = %board.title,
        "Board created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedBoard { id: board.id },
        }),
    ))
}

/// PUT /api/v1/boards/{id}
///
/// Partially update a board. Only fields present in the body are written;
/// an empty body is accepted and changes nothing.
pub async fn update_board(
    user: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<BoardId>,
    body: Result<Json<BoardPatch>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(mut patch) = body?;
    patch
        .validate()
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let board = BoardRepo::update(&state.pool, board_id, &user.owner_id, &patch)
        .await?
        .ok_or_else(|| not_found(board_id))?;

    tracing::debug!(
        board_id = %board_id,
        owner_id = %user.owner_id,
        title = patch.title.is_some(),
        content = patch.elements.is_some(),
        "Board updated",
    );

    Ok(Json(DataResponse {
        data: BoardUpdated {
            id: board.id,
            updated_at: board.updated_at,
        },
    }))
}

/// DELETE /api/v1/boards/{id}
///
/// Idempotent: deleting a board that is already gone still returns 204.
pub async fn delete_board(
    user: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<BoardId>,
) -> AppResult<impl IntoResponse> {
    let deleted = BoardRepo::delete(&state.pool, board_id, &user.owner_id).await?;

    tracing::info!(
        board_id = %board_id,
        owner_id = %user.owner_id,
        deleted,
        "Board delete requested",
    );

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/boards/{id}/download
///
/// Serve the board as a canvas file attachment.
pub async fn download_board(
    user: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<BoardId>,
) -> AppResult<impl IntoResponse> {
    let board = BoardRepo::find_by_id(&state.pool, board_id, &user.owner_id)
        .await?
        .ok_or_else(|| not_found(board_id))?;

    let body = canvas_file(
        &board.elements,
        &board.view_state,
        board.file_blobs.as_deref(),
    )?;

    let filename = download_filename(&board.title).replace('"', "_");
    let disposition =
        HeaderValue::from_bytes(format!("attachment; filename=\"{filename}\"").as_bytes())
            .map_err(|e| AppError::InternalError(format!("invalid download header: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(CANVAS_FILE_MIME)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
