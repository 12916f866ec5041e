//! Shared domain types for the chessdash project.

pub mod config;
pub mod game;
pub mod month;
pub mod summary;
pub mod time_control;

mod errors;

pub use errors::{ChessdashError, Result};
