//! Recipe records and list queries.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Store-assigned recipe identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeId(Uuid);

impl RecipeId {
    /// Generate a new random recipe ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse from a string.
    pub fn parse(s: &str) -> crate::Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| crate::Error::InvalidRecipeId(format!("{s}: {e}")))
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecipeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for RecipeId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Debug for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecipeId({})", self.0)
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recipe as exchanged with the request boundary.
///
/// Creation ignores any `id` on the input; the store assigns identity.
/// List-valued fields preserve input order and are not deduplicated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Store-assigned identity. `None` until the recipe is created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecipeId>,
    pub name: String,
    #[serde(default)]
    pub cuisine: String,
    /// Preparation time in minutes.
    #[serde(default)]
    pub prep_minutes: i32,
    #[serde(default)]
    pub calories: i32,
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Cost per serving. Not range-checked; negative values pass through.
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub shelf_life_days: i32,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form nutrition summary.
    #[serde(default)]
    pub nutrition: String,
}

/// Recipe list filter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeQuery {
    /// Acceptable cuisine labels. Empty means no cuisine filter.
    #[serde(default)]
    pub cuisines: Vec<String>,
    /// Spicy-only flag. Accepted for wire compatibility but currently a
    /// no-op: no recipe field encodes spiciness.
    #[serde(default)]
    pub spicy: bool,
}
