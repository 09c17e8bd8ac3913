//! Request extractors shared by handlers.
//!
//! - [`auth::AuthUser`] -- Extracts the session principal from a JWT Bearer token.

pub mod auth;
