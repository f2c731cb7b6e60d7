//! Error type and `Result` alias for the crate.

use thiserror::Error;

/// Errors returned by the library.
#[derive(Debug, Error)]
pub enum LensError {
    /// A caller-supplied value (feature, lens, query) was invalid.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A [`Config`](crate::types::Config) value failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, LensError>;
