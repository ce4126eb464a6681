//! Database row models and the pure record <-> row mapping.
//!
//! Mapping functions are side-effect free: the caller supplies the wall
//! clock, so they can be unit-tested without a live store.

use crate::error::{StoreError, StoreResult};
use spiceroute_core::{FeedbackEntry, Preference, Recipe, RecipeId, effective_cooked_at};
use sqlx::FromRow;
use time::{OffsetDateTime, UtcOffset};
use uuid::Uuid;

/// Encode list-valued fields (cuisines, allergies, ingredients, tags) as
/// JSON TEXT. Both backends store them this way so the row model stays
/// backend-uniform.
pub(crate) fn encode_labels(labels: &[String]) -> StoreResult<String> {
    serde_json::to_string(labels).map_err(|e| StoreError::Internal(format!("encode labels: {e}")))
}

pub(crate) fn decode_labels(raw: &str) -> StoreResult<Vec<String>> {
    serde_json::from_str(raw).map_err(|e| StoreError::Internal(format!("decode labels: {e}")))
}

/// Preference profile record, unique on `user_id`.
#[derive(Debug, Clone, FromRow)]
pub struct PreferenceRow {
    pub user_id: String,
    pub cuisines: String,
    pub allergies: String,
    pub budget_week: f64,
    pub spicy: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl PreferenceRow {
    /// Map a wire record to a row, validating the key field.
    ///
    /// `now` stamps both audit columns; on conflict the store keeps the
    /// original `created_at` and takes the new `updated_at`.
    pub fn from_record(record: &Preference, now: OffsetDateTime) -> StoreResult<Self> {
        record.validate()?;
        Ok(Self {
            user_id: record.user_id.clone(),
            cuisines: encode_labels(&record.cuisines)?,
            allergies: encode_labels(&record.allergies)?,
            budget_week: record.budget_week,
            spicy: record.spicy,
            created_at: now,
            updated_at: now,
        })
    }

    /// Map a row back to the wire record shape.
    pub fn into_record(self) -> StoreResult<Preference> {
        Ok(Preference {
            user_id: self.user_id,
            cuisines: decode_labels(&self.cuisines)?,
            allergies: decode_labels(&self.allergies)?,
            budget_week: self.budget_week,
            spicy: self.spicy,
        })
    }
}

/// Recipe record, unique on `id`.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    pub id: Uuid,
    pub name: String,
    pub cuisine: String,
    pub prep_minutes: i32,
    pub calories: i32,
    pub ingredients: String,
    pub cost: f64,
    pub shelf_life_days: i32,
    pub tags: String,
    pub nutrition: String,
    pub created_at: OffsetDateTime,
}

impl RecipeRow {
    /// Map a wire record to a row under a store-assigned identity.
    /// Any `id` on the input record is ignored.
    pub fn from_record(id: RecipeId, record: &Recipe, now: OffsetDateTime) -> StoreResult<Self> {
        Ok(Self {
            id: *id.as_uuid(),
            name: record.name.clone(),
            cuisine: record.cuisine.clone(),
            prep_minutes: record.prep_minutes,
            calories: record.calories,
            ingredients: encode_labels(&record.ingredients)?,
            cost: record.cost,
            shelf_life_days: record.shelf_life_days,
            tags: encode_labels(&record.tags)?,
            nutrition: record.nutrition.clone(),
            created_at: now,
        })
    }

    /// Map a row back to the wire record shape, id included.
    pub fn into_record(self) -> StoreResult<Recipe> {
        Ok(Recipe {
            id: Some(RecipeId::from(self.id)),
            name: self.name,
            cuisine: self.cuisine,
            prep_minutes: self.prep_minutes,
            calories: self.calories,
            ingredients: decode_labels(&self.ingredients)?,
            cost: self.cost,
            shelf_life_days: self.shelf_life_days,
            tags: decode_labels(&self.tags)?,
            nutrition: self.nutrition,
        })
    }
}

/// Feedback record, unique on the natural key `(user_id, dish_id, cooked_at)`.
#[derive(Debug, Clone, FromRow)]
pub struct FeedbackRow {
    pub user_id: String,
    pub dish_id: String,
    pub cooked_at: OffsetDateTime,
    pub rating: i32,
    pub skipped: bool,
    pub substituted_with: String,
    pub comment: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl FeedbackRow {
    /// Map a wire entry to a row.
    ///
    /// Validates the key fields and resolves the effective cooked-at: RFC
    /// 3339 input is parsed as-is, anything unparsable takes `now` as the
    /// key component instead of being rejected. The result is normalized
    /// to UTC so two spellings of the same instant land on the same
    /// natural key regardless of backend storage representation.
    pub fn from_entry(entry: &FeedbackEntry, now: OffsetDateTime) -> StoreResult<Self> {
        entry.validate()?;
        Ok(Self {
            user_id: entry.user_id.clone(),
            dish_id: entry.dish_id.clone(),
            cooked_at: effective_cooked_at(&entry.cooked_at, now).to_offset(UtcOffset::UTC),
            rating: entry.rating,
            skipped: entry.skipped,
            substituted_with: entry.substituted_with.clone(),
            comment: entry.comment.clone(),
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn now() -> OffsetDateTime {
        datetime!(2024-06-01 10:00:00 UTC)
    }

    #[test]
    fn test_labels_roundtrip() {
        let labels = vec!["italian".to_string(), "thai".to_string()];
        let encoded = encode_labels(&labels).unwrap();
        assert_eq!(decode_labels(&encoded).unwrap(), labels);
        assert_eq!(decode_labels("[]").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_preference_mapping_roundtrip() {
        let record = Preference {
            user_id: "u1".to_string(),
            cuisines: vec!["mexican".to_string()],
            allergies: vec!["shellfish".to_string()],
            budget_week: 72.5,
            spicy: true,
        };
        let row = PreferenceRow::from_record(&record, now()).unwrap();
        assert_eq!(row.created_at, now());
        assert_eq!(row.into_record().unwrap(), record);
    }

    #[test]
    fn test_preference_mapping_rejects_empty_user() {
        let record = Preference {
            user_id: String::new(),
            cuisines: vec![],
            allergies: vec![],
            budget_week: 0.0,
            spicy: false,
        };
        let err = PreferenceRow::from_record(&record, now()).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_recipe_mapping_assigns_given_id() {
        let record = Recipe {
            id: None,
            name: "carbonara".to_string(),
            cuisine: "italian".to_string(),
            prep_minutes: 25,
            calories: 640,
            ingredients: vec!["spaghetti".to_string(), "egg".to_string()],
            cost: 11.0,
            shelf_life_days: 2,
            tags: vec!["dinner".to_string()],
            nutrition: "high-protein".to_string(),
        };
        let id = RecipeId::new();
        let row = RecipeRow::from_record(id, &record, now()).unwrap();
        assert_eq!(row.id, *id.as_uuid());

        let back = row.into_record().unwrap();
        assert_eq!(back.id, Some(id));
        assert_eq!(back.ingredients, record.ingredients);
    }

    #[test]
    fn test_feedback_mapping_parses_cooked_at() {
        let entry = FeedbackEntry {
            user_id: "u1".to_string(),
            dish_id: "d1".to_string(),
            rating: 4,
            skipped: false,
            substituted_with: String::new(),
            comment: "good".to_string(),
            cooked_at: "2024-01-01T12:00:00Z".to_string(),
        };
        let row = FeedbackRow::from_entry(&entry, now()).unwrap();
        assert_eq!(row.cooked_at, datetime!(2024-01-01 12:00:00 UTC));
    }

    #[test]
    fn test_feedback_mapping_normalizes_offset_to_utc() {
        let base = FeedbackEntry {
            user_id: "u1".to_string(),
            dish_id: "d1".to_string(),
            rating: 4,
            skipped: false,
            substituted_with: String::new(),
            comment: String::new(),
            cooked_at: "2024-01-01T12:00:00+02:00".to_string(),
        };
        let mut utc_spelling = base.clone();
        utc_spelling.cooked_at = "2024-01-01T10:00:00Z".to_string();

        let row = FeedbackRow::from_entry(&base, now()).unwrap();
        let utc_row = FeedbackRow::from_entry(&utc_spelling, now()).unwrap();
        assert_eq!(row.cooked_at.offset(), UtcOffset::UTC);
        assert_eq!(row.cooked_at, utc_row.cooked_at);
    }

    #[test]
    fn test_feedback_mapping_falls_back_on_unparsable_time() {
        let entry = FeedbackEntry {
            user_id: "u1".to_string(),
            dish_id: "d1".to_string(),
            rating: 4,
            skipped: false,
            substituted_with: String::new(),
            comment: String::new(),
            cooked_at: "last tuesday".to_string(),
        };
        let row = FeedbackRow::from_entry(&entry, now()).unwrap();
        assert_eq!(row.cooked_at, now());
    }

    #[test]
    fn test_feedback_mapping_rejects_missing_key_fields() {
        let entry = FeedbackEntry {
            user_id: "u1".to_string(),
            dish_id: String::new(),
            rating: 4,
            skipped: false,
            substituted_with: String::new(),
            comment: String::new(),
            cooked_at: "2024-01-01T12:00:00Z".to_string(),
        };
        assert!(matches!(
            FeedbackRow::from_entry(&entry, now()),
            Err(StoreError::Validation(_))
        ));
    }
}
