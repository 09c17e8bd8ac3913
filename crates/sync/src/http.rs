//! REST client for the board API.
//!
//! Wraps `/api/v1/boards` using [`reqwest`], authenticating every request
//! with the session's bearer token and unwrapping the `{ "data": ... }`
//! response envelope.

use inkboard_core::board::{
    Board, BoardPatch, BoardSummary, BoardUpdated, CreateBoard, CreatedBoard,
};
use inkboard_core::types::BoardId;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::SyncError;
use crate::store::BoardStore;

/// Path prefix of the versioned API.
const API_PREFIX: &str = "/api/v1";

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// HTTP-backed [`BoardStore`].
pub struct HttpBoardStore {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl HttpBoardStore {
    /// Create a store for the API at `api_url`, e.g. `http://host:3000`.
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url, token)
    }

    /// Create a store reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        api_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            api_url,
            token: token.into(),
        }
    }

    fn boards_url(&self) -> String {
        format!("{}{API_PREFIX}/boards", self.api_url)
    }

    fn board_url(&self, id: BoardId) -> String {
        format!("{}{API_PREFIX}/boards/{id}", self.api_url)
    }

    // ---- private helpers ----

    /// Map non-2xx responses to [`SyncError`]. 404 becomes
    /// [`SyncError::NotFound`]; anything else keeps its status and body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, SyncError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SyncError::NotFound);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SyncError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful enveloped JSON body.
    async fn parse_data<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SyncError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        Ok(envelope.data)
    }
}

impl BoardStore for HttpBoardStore {
    async fn list(&self) -> Result<Vec<BoardSummary>, SyncError> {
        let response = self
            .client
            .get(self.boards_url())
            .bearer_auth(&self.token)
            .send()
            .await?;

        Self::parse_data(response).await
    }

    async fn get(&self, id: BoardId) -> Result<Board, SyncError> {
        let response = self
            .client
            .get(self.board_url(id))
            .bearer_auth(&self.token)
            .send()
            .await?;

        Self::parse_data(response).await
    }

    async fn create(&self, title: Option<&str>) -> Result<CreatedBoard, SyncError> {
        let body = CreateBoard {
            title: title.map(str::to_string),
        };
        let response = self
            .client
            .post(self.boards_url())
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        Self::parse_data(response).await
    }

    async fn update(&self, id: BoardId, patch: &BoardPatch) -> Result<BoardUpdated, SyncError> {
        let response = self
            .client
            .put(self.board_url(id))
            .bearer_auth(&self.token)
            .json(patch)
            .send()
            .await?;

        Self::parse_data(response).await
    }

    async fn delete(&self, id: BoardId) -> Result<(), SyncError> {
        let response = self
            .client
            .delete(self.board_url(id))
            .bearer_auth(&self.token)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }
}
