//! One signed-in client: a store, its cache, its notices and settings.

use std::sync::Arc;

use inkboard_core::board::{Board, BoardSummary};
use inkboard_core::types::BoardId;

use crate::autosave::Autosaver;
use crate::cache::{QueryCache, QueryKey};
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::http::HttpBoardStore;
use crate::notices::{NoticeBus, SyncNotice};
use crate::optimistic::{self, DeleteOutcome, RenameOutcome};
use crate::share::{self, ImportError, ShareLink};
use crate::store::BoardStore;

/// Shared handles for everything the client does on behalf of one session.
pub struct SyncSession<S: BoardStore> {
    pub store: Arc<S>,
    pub cache: Arc<QueryCache>,
    pub notices: NoticeBus,
    config: SyncConfig,
}

impl SyncSession<HttpBoardStore> {
    /// Session talking to the API at `config.api_url` with a bearer token.
    pub fn connect(config: SyncConfig, token: impl Into<String>) -> Self {
        let store = HttpBoardStore::new(config.api_url.clone(), token);
        Self::new(Arc::new(store), config)
    }
}

impl<S: BoardStore> SyncSession<S> {
    pub fn new(store: Arc<S>, config: SyncConfig) -> Self {
        Self {
            store,
            cache: Arc::new(QueryCache::new()),
            notices: NoticeBus::default(),
            config,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub async fn boards(&self) -> Result<Vec<BoardSummary>, SyncError> {
        self.cache.fetch_boards(self.store.as_ref()).await
    }

    /// Load a board for viewing. A failed load is also reported on the
    /// notice bus, with not-found told apart from other errors.
    pub async fn board(&self, id: BoardId) -> Result<Board, SyncError> {
        let loaded = self.cache.fetch_board(self.store.as_ref(), id).await;
        if let Err(e) = &loaded {
            tracing::warn!(board_id = %id, error = %e, "Failed to load board");
            self.notices.publish(match e {
                SyncError::NotFound => SyncNotice::BoardNotFound { board_id: id },
                other => SyncNotice::LoadFailed {
                    board_id: id,
                    reason: other.to_string(),
                },
            });
        }
        loaded
    }

    /// Create an empty board and mark the cached list stale.
    pub async fn create_board(&self, title: Option<&str>) -> Result<BoardId, SyncError> {
        match self.store.create(title).await {
            Ok(created) => {
                self.cache.invalidate(QueryKey::Boards).await;
                tracing::info!(board_id = %created.id, "Board created");
                Ok(created.id)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create board");
                self.notices.publish(SyncNotice::CreateFailed {
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Start autosaving canvas changes to `board_id`.
    pub fn open_board(&self, board_id: BoardId) -> Autosaver<S> {
        Autosaver::new(
            Arc::clone(&self.store),
            Arc::clone(&self.cache),
            self.notices.clone(),
            board_id,
            self.config.debounce,
        )
    }

    pub async fn rename(
        &self,
        id: BoardId,
        current_title: &str,
        input: &str,
    ) -> Result<RenameOutcome, SyncError> {
        optimistic::rename_board(
            self.store.as_ref(),
            &self.cache,
            &self.notices,
            id,
            current_title,
            input,
        )
        .await
    }

    pub async fn delete(&self, id: BoardId) -> Result<DeleteOutcome, SyncError> {
        optimistic::delete_board(self.store.as_ref(), &self.cache, &self.notices, id).await
    }

    /// Share link for `id` on the configured public origin.
    pub async fn share_link(&self, id: BoardId) -> Result<ShareLink, SyncError> {
        share::create_share_link(
            self.store.as_ref(),
            &self.notices,
            id,
            &self.config.public_origin,
        )
        .await
    }

    pub async fn import(&self, fragment: &str) -> Result<BoardId, ImportError> {
        share::import_from_fragment(self.store.as_ref(), &self.cache, fragment).await
    }
}
