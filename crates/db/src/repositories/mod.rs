//! Repositories: zero-sized structs whose associated functions take a pool.

pub mod board_repo;

pub use board_repo::BoardRepo;
