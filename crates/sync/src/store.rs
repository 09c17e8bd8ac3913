//! The storage collaborator seen from the client.
//!
//! The owner is implied by the session the store was built with, so none of
//! the operations take one.

use std::future::Future;

use inkboard_core::board::{Board, BoardPatch, BoardSummary, BoardUpdated, CreatedBoard};
use inkboard_core::types::BoardId;

use crate::error::SyncError;

/// Owner-scoped board CRUD.
///
/// Implemented by [`HttpBoardStore`](crate::http::HttpBoardStore) over the
/// REST API; tests substitute an in-memory implementation.
pub trait BoardStore: Send + Sync + 'static {
    /// Summaries of the caller's boards, most recently updated first.
    fn list(&self) -> impl Future<Output = Result<Vec<BoardSummary>, SyncError>> + Send;

    /// Fetch one board. Missing and foreign boards are [`SyncError::NotFound`].
    fn get(&self, id: BoardId) -> impl Future<Output = Result<Board, SyncError>> + Send;

    /// Create an empty board. The server fills in the default title when
    /// `title` is `None`.
    fn create(
        &self,
        title: Option<&str>,
    ) -> impl Future<Output = Result<CreatedBoard, SyncError>> + Send;

    /// Apply a partial update. Only fields present in `patch` are written.
    fn update(
        &self,
        id: BoardId,
        patch: &BoardPatch,
    ) -> impl Future<Output = Result<BoardUpdated, SyncError>> + Send;

    /// Delete a board. Deleting a board that is already gone succeeds.
    fn delete(&self, id: BoardId) -> impl Future<Output = Result<(), SyncError>> + Send;
}
