//! Preference reconciler trait: one profile row per user.

use crate::error::StoreResult;
use async_trait::async_trait;
use spiceroute_core::Preference;

/// Repository for user preference profiles.
#[async_trait]
pub trait PreferenceRepo: Send + Sync {
    /// Insert or fully replace the profile for `pref.user_id`.
    ///
    /// The upsert is a single atomic statement: every non-key field is
    /// overwritten with the input's values, never merged. Returns the
    /// profile as persisted (round-tripped through the store, not the
    /// input echoed). Safe to retry.
    async fn upsert_preference(&self, pref: &Preference) -> StoreResult<Preference>;

    /// Get the profile for a user. `None` when no profile exists; any
    /// other store failure surfaces as an error.
    async fn get_preference(&self, user_id: &str) -> StoreResult<Option<Preference>>;
}
