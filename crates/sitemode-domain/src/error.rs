//! Domain error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain format: {0}")]
    InvalidFormat(String),
}
