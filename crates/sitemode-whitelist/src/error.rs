//! Whitelist error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WhitelistError {
    #[error(transparent)]
    InvalidDomain(#[from] sitemode_domain::DomainError),

    #[error("Storage unavailable: {0}")]
    Storage(#[from] sitemode_storage::StorageError),
}
