//! Domain types shared by the Inkboard server and client crates.
//!
//! This crate has no internal dependencies so that the repository layer,
//! the HTTP API and the client-side synchronizer all agree on the same
//! board model, view-state subset and share-link format.

pub mod board;
pub mod error;
pub mod export;
pub mod share;
pub mod types;
pub mod view_state;
