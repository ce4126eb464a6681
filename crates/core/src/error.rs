//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid preference: {0}")]
    InvalidPreference(String),

    #[error("invalid feedback entry: {0}")]
    InvalidFeedbackEntry(String),

    #[error("invalid recipe id: {0}")]
    InvalidRecipeId(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
