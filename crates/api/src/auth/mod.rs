//! Session primitives.
//!
//! Sign-in happens at the external identity provider. This server only
//! validates the session tokens it issues:
//!
//! - [`jwt`] -- HS256 session-token validation (and issuance, for tests and
//!   local development).

pub mod jwt;
