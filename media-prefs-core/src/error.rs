//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Preferences layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum PrefsError {
    /// Storage layer error (I/O, backend unavailable)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Stored value has a different type than requested
    #[error("Type mismatch for key {key}: expected {expected}")]
    TypeMismatch { key: String, expected: String },

    /// Store file exceeds the accepted size
    #[error("Store file too large: {size} bytes (max: {max} bytes)")]
    StoreTooLarge { size: u64, max: u64 },

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl PrefsError {
    /// Whether it is expected behavior (bad stored data, missing adapters), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::TypeMismatch { .. } | Self::ValidationError(_) => true,
            Self::StorageError(_) | Self::SerializationError(_) | Self::StoreTooLarge { .. } => {
                false
            }
        }
    }
}

impl From<serde_json::Error> for PrefsError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for PrefsError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}

/// Preferences layer Result type alias
pub type PrefsResult<T> = std::result::Result<T, PrefsError>;
