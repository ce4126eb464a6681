//! Feedback batch ingestor trait.

use crate::error::StoreResult;
use async_trait::async_trait;
use spiceroute_core::FeedbackEntry;

/// Repository for post-meal feedback.
#[async_trait]
pub trait FeedbackRepo: Send + Sync {
    /// Apply a batch of feedback entries in one transaction.
    ///
    /// Entries are applied in input order, each upserted on the natural
    /// key `(user_id, dish_id, cooked_at)`: an existing row keeps its key
    /// fields and takes the new rating, skipped flag, substitution, and
    /// comment. Any failure rolls back the whole batch and surfaces as
    /// [`StoreError::BatchEntry`](crate::StoreError::BatchEntry) naming
    /// the failing entry's position. Safe to retry after a failure:
    /// either every entry was applied or none were.
    async fn submit_feedback(&self, entries: &[FeedbackEntry]) -> StoreResult<()>;
}
