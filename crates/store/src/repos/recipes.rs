//! Recipe repository trait: creation and filtered listing.

use crate::error::StoreResult;
use async_trait::async_trait;
use spiceroute_core::{Recipe, RecipeId, RecipeQuery};

/// Repository for recipes.
#[async_trait]
pub trait RecipeRepo: Send + Sync {
    /// Insert a recipe under a newly assigned identity.
    ///
    /// Any id on the input is ignored. No field validation is performed
    /// beyond type constraints; a negative cost is accepted as-is. Not
    /// idempotent: retrying a create inserts a second recipe.
    async fn create_recipe(&self, recipe: &Recipe) -> StoreResult<RecipeId>;

    /// List recipes matching the query, capped at
    /// [`MAX_RECIPE_LIST_RESULTS`](spiceroute_core::MAX_RECIPE_LIST_RESULTS)
    /// rows in the store's natural retrieval order.
    ///
    /// An empty `cuisines` list disables the cuisine filter. The `spicy`
    /// flag is accepted but filters nothing: no recipe field encodes
    /// spiciness. An empty result set is not an error.
    async fn list_recipes(&self, query: &RecipeQuery) -> StoreResult<Vec<Recipe>>;
}
