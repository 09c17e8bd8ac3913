//! Explicit read cache for board queries.
//!
//! One [`QueryCache`] is created per session and passed around as
//! `Arc<QueryCache>`. Entries are last-write-wins per key; nothing locks
//! across keys.

use std::collections::HashMap;

use inkboard_core::board::{Board, BoardPatch, BoardSummary};
use inkboard_core::types::{BoardId, Timestamp};
use tokio::sync::RwLock;

use crate::error::SyncError;
use crate::store::BoardStore;

/// Identifies a cached query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The board list.
    Boards,
    /// A single full board.
    Board(BoardId),
}

/// A cached value and whether it has been invalidated since it was set.
struct Entry<T> {
    value: T,
    stale: bool,
}

impl<T> Entry<T> {
    fn fresh(value: T) -> Self {
        Self {
            value,
            stale: false,
        }
    }
}

#[derive(Default)]
struct Entries {
    boards: Option<Entry<Vec<BoardSummary>>>,
    board: HashMap<BoardId, Entry<Board>>,
}

/// Cache of board list and board reads.
///
/// Invalidation marks an entry stale without dropping it: readers keep
/// seeing the last known value while the read-through helpers refetch.
#[derive(Default)]
pub struct QueryCache {
    entries: RwLock<Entries>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self) -> Option<Vec<BoardSummary>> {
        self.entries
            .read()
            .await
            .boards
            .as_ref()
            .map(|e| e.value.clone())
    }

    /// Replace the cached list. `None` clears the entry.
    pub async fn set_list(&self, boards: Option<Vec<BoardSummary>>) {
        self.entries.write().await.boards = boards.map(Entry::fresh);
    }

    /// Edit the cached list in place. Does nothing when the list is not
    /// cached.
    pub async fn update_list(&self, f: impl FnOnce(&mut Vec<BoardSummary>)) {
        if let Some(entry) = self.entries.write().await.boards.as_mut() {
            f(&mut entry.value);
        }
    }

    pub async fn board(&self, id: BoardId) -> Option<Board> {
        self.entries
            .read()
            .await
            .board
            .get(&id)
            .map(|e| e.value.clone())
    }

    pub async fn set_board(&self, board: Board) {
        self.entries
            .write()
            .await
            .board
            .insert(board.id, Entry::fresh(board));
    }

    /// Write the fields carried by `patch` into the cached board, if that
    /// board is cached. Returns whether an entry was touched.
    pub async fn merge_board(
        &self,
        id: BoardId,
        patch: &BoardPatch,
        updated_at: Option<Timestamp>,
    ) -> bool {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.board.get_mut(&id) else {
            return false;
        };
        entry.value.apply(patch);
        if let Some(updated_at) = updated_at {
            entry.value.updated_at = updated_at;
        }
        true
    }

    /// Mark an entry stale so that the next read-through goes to the store.
    pub async fn invalidate(&self, key: QueryKey) {
        let mut entries = self.entries.write().await;
        let stale = match key {
            QueryKey::Boards => entries.boards.as_mut().map(|e| &mut e.stale),
            QueryKey::Board(id) => entries.board.get_mut(&id).map(|e| &mut e.stale),
        };
        if let Some(stale) = stale {
            *stale = true;
        }
    }

    /// Drop a board entry entirely, e.g. after the board was deleted.
    pub async fn remove_board(&self, id: BoardId) {
        self.entries.write().await.board.remove(&id);
    }

    /// Whether `key` is missing or has been invalidated.
    pub async fn is_stale(&self, key: QueryKey) -> bool {
        let entries = self.entries.read().await;
        match key {
            QueryKey::Boards => entries.boards.as_ref().map_or(true, |e| e.stale),
            QueryKey::Board(id) => entries.board.get(&id).map_or(true, |e| e.stale),
        }
    }

    /// Read-through board list.
    pub async fn fetch_boards<S: BoardStore>(
        &self,
        store: &S,
    ) -> Result<Vec<BoardSummary>, SyncError> {
        if !self.is_stale(QueryKey::Boards).await {
            if let Some(boards) = self.list().await {
                return Ok(boards);
            }
        }
        let boards = store.list().await?;
        self.set_list(Some(boards.clone())).await;
        Ok(boards)
    }

    /// Read-through single board.
    pub async fn fetch_board<S: BoardStore>(
        &self,
        store: &S,
        id: BoardId,
    ) -> Result<Board, SyncError> {
        if !self.is_stale(QueryKey::Board(id)).await {
            if let Some(board) = self.board(id).await {
                return Ok(board);
            }
        }
        let board = store.get(id).await?;
        self.set_board(board.clone()).await;
        Ok(board)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
