//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Domain(#[from] sitemode_domain::DomainError),

    #[error("Whitelist error: {0}")]
    Whitelist(#[from] sitemode_whitelist::WhitelistError),

    #[error("Channel error: {0}")]
    Channel(#[from] sitemode_channel::ChannelError),

    #[error("Invalid page URL: {0}")]
    InvalidPageUrl(String),
}
