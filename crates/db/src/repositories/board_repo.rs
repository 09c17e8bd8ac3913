//! Repository for the `boards` table.
//!
//! Every query is scoped by `owner_id`: a board owned by someone else
//! behaves exactly like a board that does not exist.

use inkboard_core::board::{Board, BoardPatch, BoardSummary, DEFAULT_TITLE};
use inkboard_core::types::BoardId;
use sqlx::PgPool;

use crate::models::board::{BoardRow, BoardSummaryRow};

/// Column list for full `boards` queries.
const COLUMNS: &str = "\
    id, owner_id, title, elements, view_state, file_blobs, \
    thumbnail, created_at, updated_at";

/// Column list for board list queries.
const SUMMARY_COLUMNS: &str = "id, title, thumbnail, created_at, updated_at";

/// Provides data access for boards.
pub struct BoardRepo;

impl BoardRepo {
    /// List an owner's boards, most recently updated first.
    pub async fn list(pool: &PgPool, owner_id: &str) -> Result<Vec<BoardSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM boards \
             WHERE owner_id = $1 ORDER BY updated_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, BoardSummaryRow>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(BoardSummary::from).collect())
    }

    /// Find a board by id, if it exists and belongs to `owner_id`.
    pub async fn find_by_id(
        pool: &PgPool,
        id: BoardId,
        owner_id: &str,
    ) -> Result<Option<Board>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM boards WHERE id = $1 AND owner_id = $2");
        let row = sqlx::query_as::<_, BoardRow>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Board::from))
    }

    /// Create an empty board. The id is generated here (UUID v7, so ids sort
    /// by creation time); content columns take their defaults.
    pub async fn create(
        pool: &PgPool,
        owner_id: &str,
        title: Option<&str>,
    ) -> Result<Board, sqlx::Error> {
        let query = format!(
            "INSERT INTO boards (id, owner_id, title) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, BoardRow>(&query)
            .bind(BoardId::now_v7())
            .bind(owner_id)
            .bind(title.unwrap_or(DEFAULT_TITLE))
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }

    /// Partially update a board.
    ///
    /// Uses `COALESCE` so only provided fields are changed. The nullable
    /// columns use a provided-flag plus value pair so they can be cleared.
    /// An empty patch writes nothing and returns the current row.
    pub async fn update(
        pool: &PgPool,
        id: BoardId,
        owner_id: &str,
        patch: &BoardPatch,
    ) -> Result<Option<Board>, sqlx::Error> {
        if patch.is_empty() {
            return Self::find_by_id(pool, id, owner_id).await;
        }

        let files_provided = patch.file_blobs.is_some();
        let files_value = patch.file_blobs.as_ref().and_then(|v| v.as_deref());
        let thumbnail_provided = patch.thumbnail.is_some();
        let thumbnail_value = patch.thumbnail.as_ref().and_then(|v| v.as_deref());

        let query = format!(
            "UPDATE boards SET \
                 title      = COALESCE($3, title), \
                 elements   = COALESCE($4, elements), \
                 view_state = COALESCE($5, view_state), \
                 file_blobs = CASE WHEN $6 THEN $7 ELSE file_blobs END, \
                 thumbnail  = CASE WHEN $8 THEN $9 ELSE thumbnail END \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, BoardRow>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&patch.title)
            .bind(&patch.elements)
            .bind(&patch.view_state)
            .bind(files_provided)
            .bind(files_value)
            .bind(thumbnail_provided)
            .bind(thumbnail_value)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Board::from))
    }

    /// Delete a board.
    ///
    /// Returns `true` if a row was deleted. Deleting a missing (or foreign)
    /// board is not an error.
    pub async fn delete(pool: &PgPool, id: BoardId, owner_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
