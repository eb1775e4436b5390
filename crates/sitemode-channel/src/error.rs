//! Channel error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("Message transport failed: {0}")]
    Transport(String),

    #[error("Empty response from proxy")]
    EmptyResponse,

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}
