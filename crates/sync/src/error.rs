use inkboard_core::share::ShareError;

/// Errors from the client-side sync layer.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code other than 404.
    #[error("Board API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The board does not exist or belongs to someone else.
    #[error("Board not found")]
    NotFound,

    /// A response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A share token could not be decoded.
    #[error(transparent)]
    Share(#[from] ShareError),
}
