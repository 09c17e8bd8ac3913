//! User-visible notices backed by a `tokio::sync::broadcast` channel.
//!
//! The sync layer never blocks on the UI. It publishes a [`SyncNotice`] and
//! whatever renders toasts subscribes to the [`NoticeBus`].

use inkboard_core::types::BoardId;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// SyncNotice
// ---------------------------------------------------------------------------

/// How prominently a notice should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

/// Something the user should be told about.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncNotice {
    /// An autosave request failed. The canvas keeps its state and the next
    /// edit tries again, so this is a warning.
    SaveFailed { board_id: BoardId, reason: String },
    /// The board being opened does not exist or belongs to someone else.
    BoardNotFound { board_id: BoardId },
    LoadFailed { board_id: BoardId, reason: String },
    CreateFailed { reason: String },
    RenameFailed { board_id: BoardId, reason: String },
    DeleteFailed { board_id: BoardId, reason: String },
    BoardDeleted { board_id: BoardId },
    /// A share link was built but is past the practical URL length limit.
    ShareLinkTooLong { board_id: BoardId, length: usize },
    ShareLinkCreated { board_id: BoardId },
    ShareLinkFailed { board_id: BoardId, reason: String },
}

impl SyncNotice {
    pub fn severity(&self) -> Severity {
        match self {
            Self::BoardDeleted { .. } | Self::ShareLinkCreated { .. } => Severity::Success,
            Self::ShareLinkTooLong { .. } | Self::SaveFailed { .. } => Severity::Warning,
            Self::BoardNotFound { .. }
            | Self::LoadFailed { .. }
            | Self::CreateFailed { .. }
            | Self::RenameFailed { .. }
            | Self::DeleteFailed { .. }
            | Self::ShareLinkFailed { .. } => Severity::Error,
        }
    }

    /// Short text suitable for a toast.
    pub fn message(&self) -> &'static str {
        match self {
            Self::SaveFailed { .. } => "Failed to save board changes",
            Self::BoardNotFound { .. } => "Board not found",
            Self::LoadFailed { .. } => "Failed to load board",
            Self::CreateFailed { .. } => "Failed to create board",
            Self::RenameFailed { .. } => "Failed to rename board",
            Self::DeleteFailed { .. } => "Failed to delete board",
            Self::BoardDeleted { .. } => "Board deleted",
            Self::ShareLinkTooLong { .. } => {
                "Share link is very long and may not work in all browsers"
            }
            Self::ShareLinkCreated { .. } => "Share link created",
            Self::ShareLinkFailed { .. } => "Failed to create share link",
        }
    }
}

// ---------------------------------------------------------------------------
// NoticeBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 64;

/// Fan-out channel for [`SyncNotice`]s. Cheap to clone; clones share the
/// same channel.
#[derive(Clone)]
pub struct NoticeBus {
    sender: broadcast::Sender<SyncNotice>,
}

impl NoticeBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a notice to all current subscribers. Dropped silently when
    /// nobody is listening.
    pub fn publish(&self, notice: SyncNotice) {
        tracing::debug!(?notice, "Publishing notice");
        let _ = self.sender.send(notice);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncNotice> {
        self.sender.subscribe()
    }
}

impl Default for NoticeBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
