use std::fmt::Debug;
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Settings read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origins allowed by CORS.
    pub cors_origins: Vec<String>,
    /// Per-request deadline enforced by the timeout layer.
    pub request_timeout_secs: u64,
    /// Largest request body accepted. Boards embed images as data URLs in
    /// `file_blobs`, so this is far above axum's 2 MB default.
    pub max_body_bytes: usize,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `3000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `MAX_BODY_BYTES`       | `67108864` (64 MiB)     |
    ///
    /// JWT settings come from [`JwtConfig::from_env`]. Malformed values abort
    /// startup.
    pub fn from_env() -> Self {
        let origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_parse("PORT", 3000),
            cors_origins: parse_origins(&origins),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 30),
            max_body_bytes: env_parse("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES),
            jwt: JwtConfig::from_env(),
        }
    }
}

/// Read `key` and parse it, or fall back to `default` when unset.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Debug,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} is not valid: {e:?}")),
        Err(_) => default,
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blanks_dropped() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test/,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn unset_variable_uses_default() {
        assert_eq!(env_parse("INKBOARD_TEST_SURELY_UNSET", 42u16), 42);
    }
}
