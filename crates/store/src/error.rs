//! Record store error types.

use thiserror::Error;

/// Record store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    Validation(#[from] spiceroute_core::Error),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("feedback batch failed at entry {position}: {source}")]
    BatchEntry {
        /// Zero-based position of the failing entry in the submitted batch.
        position: usize,
        #[source]
        source: Box<StoreError>,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for record store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_entry_names_position_and_cause() {
        let err = StoreError::BatchEntry {
            position: 3,
            source: Box::new(StoreError::Validation(
                spiceroute_core::Error::InvalidFeedbackEntry(
                    "user_id must not be empty".to_string(),
                ),
            )),
        };
        let msg = err.to_string();
        assert!(msg.contains("entry 3"));
        assert!(msg.contains("user_id must not be empty"));
    }
}
