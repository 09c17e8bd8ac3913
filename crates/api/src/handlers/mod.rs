//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the corresponding repository in `inkboard_db` and
//! map errors via [`AppError`](crate::error::AppError).

pub mod board;
pub mod session;
