//! Inkboard API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! app assembly) so integration tests and the binary entrypoint share the
//! same router and middleware stack.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
