//! SiteMode Storage Layer
//!
//! SQLite-based persistence for user settings. The whitelist lives here as
//! a single settings entry; there is no other durable state.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
