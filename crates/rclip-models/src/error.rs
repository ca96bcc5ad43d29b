//! Event decoding error types.

use thiserror::Error;

/// Result type for event decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Reasons a harvest-completion event is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("field is not a string: {0}")]
    NotAString(&'static str),

    #[error("field is empty: {0}")]
    EmptyField(&'static str),

    #[error("invalid manifest key '{key}': {reason}")]
    InvalidManifestKey { key: String, reason: &'static str },
}

impl DecodeError {
    pub fn invalid_manifest_key(key: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidManifestKey {
            key: key.into(),
            reason,
        }
    }
}
