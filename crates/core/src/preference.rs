//! User dietary preference profiles.

use serde::{Deserialize, Serialize};

/// A user's dietary preference profile.
///
/// At most one live profile exists per `user_id`. An upsert replaces every
/// non-key field wholesale rather than merging field by field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    /// Stable external user identifier (not store-assigned).
    pub user_id: String,
    /// Preferred cuisine labels.
    #[serde(default)]
    pub cuisines: Vec<String>,
    /// Allergy labels.
    #[serde(default)]
    pub allergies: Vec<String>,
    /// Weekly food budget. Not range-checked; negative values pass through.
    #[serde(default)]
    pub budget_week: f64,
    /// Whether the user tolerates spicy food.
    #[serde(default)]
    pub spicy: bool,
}

impl Preference {
    /// Validate the profile before it reaches the store.
    pub fn validate(&self) -> crate::Result<()> {
        if self.user_id.is_empty() {
            return Err(crate::Error::InvalidPreference(
                "user_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
