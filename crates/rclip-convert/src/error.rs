//! Managed service error types.

use thiserror::Error;

/// Result type for managed service operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Failures that never produced a service response.
///
/// A response with a non-success status is not an error at this layer; it
/// is returned as a `CreateJobReply` so the caller sees the status verbatim.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Invalid job spec: {0}")]
    InvalidSpec(String),

    #[error("Request to transcoding service failed: {0}")]
    Transport(String),
}

impl ConvertError {
    pub fn invalid_spec(msg: impl Into<String>) -> Self {
        Self::InvalidSpec(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}
