#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use inkboard_core::board::{
    normalize_title, Board, BoardPatch, BoardSummary, BoardUpdated, CreatedBoard, DEFAULT_TITLE,
    EMPTY_ELEMENTS, EMPTY_VIEW_STATE,
};
use inkboard_core::types::BoardId;
use inkboard_sync::error::SyncError;
use inkboard_sync::store::BoardStore;
use serde_json::{json, Value};
use tokio::time::Instant;

pub const OWNER: &str = "user-ada";

/// A store call as observed by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Get(BoardId),
    Create(Option<String>),
    Update(BoardId, BoardPatch),
    Delete(BoardId),
}

/// In-memory [`BoardStore`] that records every call with the (possibly
/// paused) tokio clock.
#[derive(Default)]
pub struct MemoryStore {
    boards: Mutex<HashMap<BoardId, Board>>,
    calls: Mutex<Vec<(Instant, Call)>>,
    fail_updates: AtomicBool,
    fail_deletes: AtomicBool,
    update_delay: Mutex<Option<Duration>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a board directly, bypassing the call log.
    pub fn seed(&self, title: &str) -> BoardId {
        let board = board(title);
        let id = board.id;
        self.boards.lock().unwrap().insert(id, board);
        id
    }

    pub fn board(&self, id: BoardId) -> Option<Board> {
        self.boards.lock().unwrap().get(&id).cloned()
    }

    pub fn board_count(&self) -> usize {
        self.boards.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, c)| c.clone())
            .collect()
    }

    /// Every update call with the time it was issued.
    pub fn updates(&self) -> Vec<(Instant, BoardId, BoardPatch)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(at, call)| match call {
                Call::Update(id, patch) => Some((*at, *id, patch.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Make every update take `delay` before it completes.
    pub fn delay_updates(&self, delay: Duration) {
        *self.update_delay.lock().unwrap() = Some(delay);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push((Instant::now(), call));
    }

    fn server_error() -> SyncError {
        SyncError::Api {
            status: 500,
            body: "unavailable".to_string(),
        }
    }
}

impl BoardStore for MemoryStore {
    async fn list(&self) -> Result<Vec<BoardSummary>, SyncError> {
        self.record(Call::List);
        let mut boards: Vec<Board> = self.boards.lock().unwrap().values().cloned().collect();
        boards.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(boards.into_iter().map(summary).collect())
    }

    async fn get(&self, id: BoardId) -> Result<Board, SyncError> {
        self.record(Call::Get(id));
        self.board(id).ok_or(SyncError::NotFound)
    }

    async fn create(&self, title: Option<&str>) -> Result<CreatedBoard, SyncError> {
        self.record(Call::Create(title.map(str::to_string)));
        let title = match title {
            Some(raw) => normalize_title(raw).map_err(|body| SyncError::Api { status: 400, body })?,
            None => DEFAULT_TITLE.to_string(),
        };
        let id = self.seed(&title);
        Ok(CreatedBoard { id })
    }

    async fn update(&self, id: BoardId, patch: &BoardPatch) -> Result<BoardUpdated, SyncError> {
        self.record(Call::Update(id, patch.clone()));
        let delay = *self.update_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }

        let mut boards = self.boards.lock().unwrap();
        let board = boards.get_mut(&id).ok_or(SyncError::NotFound)?;
        board.apply(patch);
        board.updated_at = Utc::now();
        Ok(BoardUpdated {
            id,
            updated_at: board.updated_at,
        })
    }

    async fn delete(&self, id: BoardId) -> Result<(), SyncError> {
        self.record(Call::Delete(id));
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }
        self.boards.lock().unwrap().remove(&id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn board(title: &str) -> Board {
    let now = Utc::now();
    Board {
        id: uuid::Uuid::now_v7(),
        owner_id: OWNER.to_string(),
        title: title.to_string(),
        elements: EMPTY_ELEMENTS.to_string(),
        view_state: EMPTY_VIEW_STATE.to_string(),
        file_blobs: None,
        thumbnail: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn summary(board: Board) -> BoardSummary {
    BoardSummary {
        id: board.id,
        title: board.title,
        thumbnail: board.thumbnail,
        created_at: board.created_at,
        updated_at: board.updated_at,
    }
}

/// `count` rectangle elements, the last one tagged with `tag`.
pub fn elements(count: usize, tag: &str) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let id = if i + 1 == count {
                tag.to_string()
            } else {
                format!("el-{i}")
            };
            json!({ "id": id, "type": "rectangle", "x": i, "y": i })
        })
        .collect()
}
