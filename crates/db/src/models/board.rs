//! Board rows.
//!
//! The wire types live in `inkboard_core::board` so the client crate can use
//! them without a database dependency; these row structs convert into them.

use inkboard_core::board::{Board, BoardSummary};
use inkboard_core::types::{BoardId, OwnerId, Timestamp};
use sqlx::FromRow;

/// A row from the `boards` table.
#[derive(Debug, Clone, FromRow)]
pub struct BoardRow {
    pub id: BoardId,
    pub owner_id: OwnerId,
    pub title: String,
    pub elements: String,
    pub view_state: String,
    pub file_blobs: Option<String>,
    pub thumbnail: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The list projection of a `boards` row.
#[derive(Debug, Clone, FromRow)]
pub struct BoardSummaryRow {
    pub id: BoardId,
    pub title: String,
    pub thumbnail: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<BoardRow> for Board {
    fn from(row: BoardRow) -> Self {
        Board {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            elements: row.elements,
            view_state: row.view_state,
            file_blobs: row.file_blobs,
            thumbnail: row.thumbnail,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<BoardSummaryRow> for BoardSummary {
    fn from(row: BoardSummaryRow) -> Self {
        BoardSummary {
            id: row.id,
            title: row.title,
            thumbnail: row.thumbnail,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
