//! Debounced autosave of canvas changes.
//!
//! Every [`CanvasChange`] cancels the pending save and schedules a new one
//! after the debounce window, so only the last snapshot of a burst is
//! written. A coarse [`Fingerprint`] of the element list suppresses saves
//! whose content matches the last save that fired.
//!
//! Pending work is never silently lost: [`Autosaver::switch_board`],
//! [`Autosaver::shutdown`] and dropping the autosaver all fire the pending
//! save immediately, addressed to the board it was scheduled for.
//!
//! ```text
//! Idle ──change──▶ PendingSave ──quiet period──▶ Saving ──▶ Idle
//!                    │    ▲                         └────▶ SaveFailed
//!                    └────┘ change
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use inkboard_core::board::BoardPatch;
use inkboard_core::types::BoardId;
use inkboard_core::view_state::ViewState;
use serde_json::Value;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::cache::QueryCache;
use crate::notices::{NoticeBus, SyncNotice};
use crate::store::BoardStore;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One change event from the canvas.
#[derive(Debug, Clone)]
pub struct CanvasChange {
    pub elements: Vec<Value>,
    /// The canvas's full application state. Only the persisted subset is
    /// kept.
    pub app_state: Value,
    pub files: Option<Value>,
}

/// Cheap change detector: serialized element length and element count.
///
/// Two different element lists of equal serialized length and count are
/// indistinguishable, so such an edit is not saved until something else
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub serialized_len: usize,
    pub count: usize,
}

/// The serialized fields written by one save.
#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    elements: String,
    view_state: String,
    file_blobs: Option<String>,
}

impl Snapshot {
    fn from_change(change: CanvasChange) -> (Self, Fingerprint) {
        let count = change.elements.len();
        let elements = Value::Array(change.elements).to_string();
        let fingerprint = Fingerprint {
            serialized_len: elements.len(),
            count,
        };
        let snapshot = Self {
            elements,
            view_state: ViewState::from_app_state(&change.app_state).to_json(),
            file_blobs: change.files.map(|files| files.to_string()),
        };
        (snapshot, fingerprint)
    }

    fn into_patch(self) -> BoardPatch {
        BoardPatch::content(self.elements, self.view_state, self.file_blobs)
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Observable save state of the active board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    PendingSave,
    Saving,
    SaveFailed,
}

struct Pending {
    board_id: BoardId,
    snapshot: Snapshot,
    fingerprint: Fingerprint,
    generation: u64,
    timer: CancellationToken,
}

struct State {
    board_id: BoardId,
    last_saved: Option<Fingerprint>,
    pending: Option<Pending>,
    generation: u64,
    in_flight: usize,
    last_failed: bool,
}

impl State {
    /// Remove the pending save and stop its timer.
    fn take_pending(&mut self) -> Option<Pending> {
        let pending = self.pending.take()?;
        pending.timer.cancel();
        Some(pending)
    }
}

struct Shared<S> {
    store: Arc<S>,
    cache: Arc<QueryCache>,
    notices: NoticeBus,
    debounce: Duration,
    state: Mutex<State>,
}

impl<S: BoardStore> Shared<S> {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Timer expiry. A superseded generation does nothing.
    async fn fire(self: Arc<Self>, generation: u64) {
        let pending = {
            let mut state = self.lock();
            if state.pending.as_ref().map(|p| p.generation) != Some(generation) {
                return;
            }
            let Some(pending) = state.pending.take() else {
                return;
            };
            state.last_saved = Some(pending.fingerprint);
            state.in_flight += 1;
            pending
        };

        self.persist(pending.board_id, pending.snapshot).await;
    }

    /// Take the pending save, if any, and run it on a new task.
    fn flush(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let pending = {
            let mut state = self.lock();
            let pending = state.take_pending()?;
            if pending.board_id == state.board_id {
                state.last_saved = Some(pending.fingerprint);
            }
            state.in_flight += 1;
            pending
        };

        tracing::debug!(board_id = %pending.board_id, "Flushing pending save");
        let shared = Arc::clone(self);
        Some(tokio::spawn(async move {
            shared.persist(pending.board_id, pending.snapshot).await;
        }))
    }

    async fn persist(&self, board_id: BoardId, snapshot: Snapshot) {
        let patch = snapshot.into_patch();
        let result = self.store.update(board_id, &patch).await;

        let failed = match result {
            Ok(updated) => {
                self.cache
                    .merge_board(board_id, &patch, Some(updated.updated_at))
                    .await;
                tracing::debug!(board_id = %board_id, "Board saved");
                false
            }
            Err(e) => {
                tracing::warn!(board_id = %board_id, error = %e, "Failed to save board");
                self.notices.publish(SyncNotice::SaveFailed {
                    board_id,
                    reason: e.to_string(),
                });
                true
            }
        };

        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.board_id == board_id {
            state.last_failed = failed;
        }
    }
}

// ---------------------------------------------------------------------------
// Autosaver
// ---------------------------------------------------------------------------

/// Debounced persister for the board currently open on the canvas.
///
/// Must be created inside a tokio runtime. Dropping it flushes any pending
/// save without waiting for the result.
pub struct Autosaver<S: BoardStore> {
    shared: Arc<Shared<S>>,
}

impl<S: BoardStore> Autosaver<S> {
    pub fn new(
        store: Arc<S>,
        cache: Arc<QueryCache>,
        notices: NoticeBus,
        board_id: BoardId,
        debounce: Duration,
    ) -> Self {
        let state = State {
            board_id,
            last_saved: None,
            pending: None,
            generation: 0,
            in_flight: 0,
            last_failed: false,
        };
        Self {
            shared: Arc::new(Shared {
                store,
                cache,
                notices,
                debounce,
                state: Mutex::new(state),
            }),
        }
    }

    /// The board changes are currently saved to.
    pub fn board_id(&self) -> BoardId {
        self.shared.lock().board_id
    }

    pub fn status(&self) -> SaveStatus {
        let state = self.shared.lock();
        if state.pending.is_some() {
            SaveStatus::PendingSave
        } else if state.in_flight > 0 {
            SaveStatus::Saving
        } else if state.last_failed {
            SaveStatus::SaveFailed
        } else {
            SaveStatus::Idle
        }
    }

    /// Record a canvas change and (re)start the debounce timer.
    pub fn on_change(&self, change: CanvasChange) {
        let (snapshot, fingerprint) = Snapshot::from_change(change);

        let (generation, timer) = {
            let mut state = self.shared.lock();
            state.take_pending();

            if state.last_saved == Some(fingerprint) {
                tracing::trace!(board_id = %state.board_id, "Unchanged fingerprint, skipping save");
                return;
            }

            state.generation += 1;
            state.last_failed = false;
            let generation = state.generation;
            let timer = CancellationToken::new();
            state.pending = Some(Pending {
                board_id: state.board_id,
                snapshot,
                fingerprint,
                generation,
                timer: timer.clone(),
            });
            (generation, timer)
        };

        let shared = Arc::clone(&self.shared);
        let debounce = shared.debounce;
        tokio::spawn(async move {
            tokio::select! {
                _ = timer.cancelled() => {}
                _ = tokio::time::sleep(debounce) => shared.fire(generation).await,
            }
        });
    }

    /// Fire the pending save now instead of waiting for the timer.
    ///
    /// Returns the handle of the spawned save, or `None` when nothing was
    /// pending.
    pub fn flush(&self) -> Option<JoinHandle<()>> {
        self.shared.flush()
    }

    /// Make `board_id` the active board, flushing the previous board's
    /// pending save first.
    pub fn switch_board(&self, board_id: BoardId) -> Option<JoinHandle<()>> {
        if self.board_id() == board_id {
            return None;
        }
        let flushed = self.shared.flush();

        let mut state = self.shared.lock();
        tracing::debug!(from = %state.board_id, to = %board_id, "Switching board");
        state.board_id = board_id;
        state.last_saved = None;
        state.last_failed = false;
        flushed
    }

    /// Stop autosaving, flushing any pending save.
    pub fn shutdown(self) -> Option<JoinHandle<()>> {
        self.shared.flush()
    }
}

impl<S: BoardStore> Drop for Autosaver<S> {
    fn drop(&mut self) {
        if self.shared.lock().pending.is_none() {
            return;
        }
        if tokio::runtime::Handle::try_current().is_err() {
            tracing::warn!("No runtime available, dropping pending save");
            return;
        }
        let _ = self.shared.flush();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
