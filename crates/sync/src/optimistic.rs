//! Optimistic rename and delete.
//!
//! Both mutations follow the same three phases:
//!
//! 1. capture the cached list as a [`Capture`] of `{previous, optimistic}`
//!    and write the optimistic version into the cache;
//! 2. issue the store call;
//! 3. on failure restore `previous` and publish a notice, and in every case
//!    invalidate the list so the next read refetches.

use inkboard_core::board::{Board, BoardPatch, BoardSummary};
use inkboard_core::types::BoardId;

use crate::cache::{QueryCache, QueryKey};
use crate::error::SyncError;
use crate::notices::{NoticeBus, SyncNotice};
use crate::store::BoardStore;

/// Cache contents before and after an optimistic edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture<T> {
    pub previous: T,
    pub optimistic: T,
}

/// Result of [`rename_board`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The trimmed input was empty or equal to the current title.
    Unchanged,
    Renamed(String),
}

/// Result of a successful [`delete_board`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Board to show next if the deleted board was open: the first
    /// remaining board of the list as it was before the delete.
    pub next_board: Option<BoardId>,
}

/// Snapshot the list and board entry, then write the optimistic list.
async fn capture(
    cache: &QueryCache,
    id: BoardId,
    edit: impl FnOnce(&mut Vec<BoardSummary>),
) -> (Capture<Option<Vec<BoardSummary>>>, Option<Board>) {
    let previous = cache.list().await;
    let previous_board = cache.board(id).await;

    let optimistic = previous.clone().map(|mut boards| {
        edit(&mut boards);
        boards
    });
    if optimistic.is_some() {
        cache.set_list(optimistic.clone()).await;
    }

    (
        Capture {
            previous,
            optimistic,
        },
        previous_board,
    )
}

async fn restore(
    cache: &QueryCache,
    id: BoardId,
    capture: Capture<Option<Vec<BoardSummary>>>,
    previous_board: Option<Board>,
) {
    cache.set_list(capture.previous).await;
    match previous_board {
        Some(board) => cache.set_board(board).await,
        None => cache.remove_board(id).await,
    }
}

/// Rename a board from user input.
///
/// The input is trimmed; an empty result or the current title is a no-op
/// that never reaches the store.
pub async fn rename_board<S: BoardStore>(
    store: &S,
    cache: &QueryCache,
    notices: &NoticeBus,
    id: BoardId,
    current_title: &str,
    input: &str,
) -> Result<RenameOutcome, SyncError> {
    let title = input.trim();
    if title.is_empty() || title == current_title {
        return Ok(RenameOutcome::Unchanged);
    }
    let title = title.to_string();

    let (snapshot, previous_board) = capture(cache, id, |boards| {
        for board in boards.iter_mut().filter(|b| b.id == id) {
            board.title = title.clone();
        }
    })
    .await;
    let patch = BoardPatch::title(title.clone());
    cache.merge_board(id, &patch, None).await;

    let result = store.update(id, &patch).await;

    if let Err(e) = &result {
        tracing::warn!(board_id = %id, error = %e, "Rename failed, restoring cache");
        restore(cache, id, snapshot, previous_board).await;
        notices.publish(SyncNotice::RenameFailed {
            board_id: id,
            reason: e.to_string(),
        });
    }
    cache.invalidate(QueryKey::Boards).await;

    result.map(|_| RenameOutcome::Renamed(title))
}

/// Delete a board, removing it from the cached list right away.
pub async fn delete_board<S: BoardStore>(
    store: &S,
    cache: &QueryCache,
    notices: &NoticeBus,
    id: BoardId,
) -> Result<DeleteOutcome, SyncError> {
    let (snapshot, previous_board) = capture(cache, id, |boards| boards.retain(|b| b.id != id)).await;
    let next_board = snapshot
        .optimistic
        .as_ref()
        .and_then(|boards| boards.first())
        .map(|b| b.id);

    let result = store.delete(id).await;

    match &result {
        Ok(()) => {
            tracing::info!(board_id = %id, "Board deleted");
            cache.remove_board(id).await;
            notices.publish(SyncNotice::BoardDeleted { board_id: id });
        }
        Err(e) => {
            tracing::warn!(board_id = %id, error = %e, "Delete failed, restoring cache");
            restore(cache, id, snapshot, previous_board).await;
            notices.publish(SyncNotice::DeleteFailed {
                board_id: id,
                reason: e.to_string(),
            });
        }
    }
    cache.invalidate(QueryKey::Boards).await;

    result.map(|()| DeleteOutcome { next_board })
}
