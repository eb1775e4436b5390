//! SiteMode Whitelist
//!
//! The persisted, ordered set of domains where the device toggle is
//! active. Loaded on demand, mutated by add/remove, never torn down.

mod error;
mod store;

pub use error::WhitelistError;
pub use store::WhitelistStore;

pub type Result<T> = std::result::Result<T, WhitelistError>;
