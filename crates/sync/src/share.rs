//! Share-link export and import.
//!
//! Export packs a stored board into a `/share#data=...` link. Import reads
//! such a link and creates a new board owned by the caller; importing the
//! same link twice yields two boards.

use inkboard_core::board::{lenient_title, BoardPatch};
use inkboard_core::share::{self, SharePayload};
use inkboard_core::types::BoardId;

use crate::cache::{QueryCache, QueryKey};
use crate::error::SyncError;
use crate::notices::{NoticeBus, SyncNotice};
use crate::store::BoardStore;

/// A share link ready to be copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub url: String,
    pub token: String,
    /// Whether the link is past the practical URL length limit. Such links
    /// are still returned.
    pub too_long: bool,
}

/// Why an import did not produce a board.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The fragment carried no `data` parameter.
    #[error("No share data found in URL")]
    NoData,

    /// Decoding or one of the store calls failed.
    #[error("Failed to import shared board: {0}")]
    Failed(#[source] SyncError),
}

/// Build a share link for a stored board.
pub async fn create_share_link<S: BoardStore>(
    store: &S,
    notices: &NoticeBus,
    board_id: BoardId,
    origin: &str,
) -> Result<ShareLink, SyncError> {
    let link = build_link(store, board_id, origin).await;

    match &link {
        Ok(link) => {
            if link.too_long {
                tracing::warn!(board_id = %board_id, length = link.url.len(), "Share link is very long");
                notices.publish(SyncNotice::ShareLinkTooLong {
                    board_id,
                    length: link.url.len(),
                });
            }
            notices.publish(SyncNotice::ShareLinkCreated { board_id });
        }
        Err(e) => {
            tracing::warn!(board_id = %board_id, error = %e, "Failed to create share link");
            notices.publish(SyncNotice::ShareLinkFailed {
                board_id,
                reason: e.to_string(),
            });
        }
    }

    link
}

async fn build_link<S: BoardStore>(
    store: &S,
    board_id: BoardId,
    origin: &str,
) -> Result<ShareLink, SyncError> {
    let board = store.get(board_id).await?;
    let token = share::encode(&SharePayload {
        title: board.title,
        elements: board.elements,
        view_state: board.view_state,
        file_blobs: board.file_blobs,
    })?;
    let url = share::share_url(origin, &token);
    let too_long = share::exceeds_url_limit(&url);

    Ok(ShareLink {
        url,
        token,
        too_long,
    })
}

/// Import the board carried by a `#data=...` URL fragment.
///
/// Creates the board with the shared title, then writes its content in a
/// single full update. Links from other clients may carry a blank or
/// over-long title; those are coerced with [`lenient_title`]. The cached board list is invalidated afterwards.
pub async fn import_from_fragment<S: BoardStore>(
    store: &S,
    cache: &QueryCache,
    fragment: &str,
) -> Result<BoardId, ImportError> {
    let token = share::token_from_fragment(fragment).ok_or(ImportError::NoData)?;
    let payload = share::decode(token).map_err(|e| ImportError::Failed(e.into()))?;

    let title = lenient_title(&payload.title);
    let created = store
        .create(Some(&title))
        .await
        .map_err(ImportError::Failed)?;

    let patch = BoardPatch::content(payload.elements, payload.view_state, payload.file_blobs);
    if let Err(e) = store.update(created.id, &patch).await {
        tracing::warn!(board_id = %created.id, error = %e, "Imported board left without content");
        return Err(ImportError::Failed(e));
    }

    cache.invalidate(QueryKey::Boards).await;
    tracing::info!(board_id = %created.id, "Imported shared board");

    Ok(created.id)
}
