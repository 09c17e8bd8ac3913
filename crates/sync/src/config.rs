//! Client configuration loaded from environment variables.

use std::time::Duration;

/// Quiet period before a canvas change is persisted.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Settings for the sync client.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the board API, without the `/api/v1` prefix.
    pub api_url: String,
    /// Public origin of the web client, used to build share links.
    pub public_origin: String,
    /// Autosave debounce window.
    pub debounce: Duration,
}

impl SyncConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env var                  | Default                  |
    /// |--------------------------|--------------------------|
    /// | `INKBOARD_API_URL`       | `http://localhost:3000`  |
    /// | `INKBOARD_PUBLIC_ORIGIN` | `http://localhost:5173`  |
    /// | `AUTOSAVE_DEBOUNCE_MS`   | `500`                    |
    ///
    /// # Panics
    ///
    /// Panics if `AUTOSAVE_DEBOUNCE_MS` is set but is not a whole number of
    /// milliseconds, matching how the server treats malformed settings.
    pub fn from_env() -> Self {
        let api_url =
            std::env::var("INKBOARD_API_URL").unwrap_or_else(|_| "http://localhost:3000".into());
        let public_origin = std::env::var("INKBOARD_PUBLIC_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:5173".into());
        let debounce = parse_debounce(std::env::var("AUTOSAVE_DEBOUNCE_MS").ok().as_deref());

        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            public_origin: public_origin.trim_end_matches('/').to_string(),
            debounce,
        }
    }
}

fn parse_debounce(raw: Option<&str>) -> Duration {
    match raw {
        None => DEFAULT_DEBOUNCE,
        Some(raw) => raw
            .trim()
            .parse()
            .map(Duration::from_millis)
            .unwrap_or_else(|e| panic!("AUTOSAVE_DEBOUNCE_MS is not valid: {e}")),
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".to_string(),
            public_origin: "http://localhost:5173".to_string(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}
