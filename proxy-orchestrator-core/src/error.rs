//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use proxy_orchestrator_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Account not configured
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Restore was requested but no state document exists
    #[error("No saved state found at {0}; nothing to restore")]
    NoSavedState(String),

    /// Validation error (bad filter regex, unknown template placeholder, ...)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// State file read/write error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::AccountNotFound(_) | Self::NoSavedState(_) | Self::ValidationError(_) => true,
            Self::Provider(e) => e.is_expected(),
            Self::StorageError(_) | Self::SerializationError(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
