//! Client-side board synchronization.
//!
//! Talks to the board API through the [`store::BoardStore`] trait, keeps an
//! explicit [`cache::QueryCache`] of what has been read, and layers the
//! debounced [`autosave::Autosaver`], the optimistic rename/delete protocol,
//! and the share-link export/import flows on top. User-visible outcomes are
//! published on a [`notices::NoticeBus`]. [`session::SyncSession`] bundles
//! all of it for one signed-in client.

pub mod autosave;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod notices;
pub mod optimistic;
pub mod session;
pub mod share;
pub mod store;
