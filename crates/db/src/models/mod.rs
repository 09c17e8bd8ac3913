//! Row structs and request DTOs, one submodule per table.

pub mod board;
