//! Post-meal feedback entries and batch submission types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// A single post-meal feedback entry.
///
/// The natural key is `(user_id, dish_id, cooked_at)`. Resubmitting the same
/// key overwrites the remaining fields; the key fields themselves are never
/// changed by an overwrite.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub user_id: String,
    pub dish_id: String,
    #[serde(default)]
    pub rating: i32,
    #[serde(default)]
    pub skipped: bool,
    #[serde(default)]
    pub substituted_with: String,
    #[serde(default)]
    pub comment: String,
    /// When the dish was cooked, as an RFC 3339 string. Unparsable values
    /// fall back to ingestion time (see [`effective_cooked_at`]).
    #[serde(default)]
    pub cooked_at: String,
}

impl FeedbackEntry {
    /// Validate the key fields before the entry reaches the store.
    pub fn validate(&self) -> crate::Result<()> {
        if self.user_id.is_empty() {
            return Err(crate::Error::InvalidFeedbackEntry(
                "user_id must not be empty".to_string(),
            ));
        }
        if self.dish_id.is_empty() {
            return Err(crate::Error::InvalidFeedbackEntry(
                "dish_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// An ordered batch of feedback entries, applied atomically.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackBatch {
    #[serde(default)]
    pub entries: Vec<FeedbackEntry>,
}

/// Resolve the effective cooked-at key component for an entry.
///
/// Parses `raw` as RFC 3339. On failure the caller-supplied `fallback`
/// (normally the ingestion wall-clock time) becomes the key component
/// instead of rejecting the entry. Two submissions that both fail to parse
/// therefore land on different keys depending on call timing.
pub fn effective_cooked_at(raw: &str, fallback: OffsetDateTime) -> OffsetDateTime {
    OffsetDateTime::parse(raw, &Rfc3339).unwrap_or(fallback)
}
