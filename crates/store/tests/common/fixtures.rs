//! Test fixtures for building wire records.
//! Note: #[allow(dead_code)] because each test file compiles common/ separately.

use spiceroute_core::{FeedbackEntry, Preference, Recipe};

/// A preference profile for the given user with representative fields.
#[allow(dead_code)]
pub fn sample_preference(user_id: &str) -> Preference {
    Preference {
        user_id: user_id.to_string(),
        cuisines: vec!["italian".to_string(), "thai".to_string()],
        allergies: vec!["peanut".to_string()],
        budget_week: 85.5,
        spicy: true,
    }
}

/// A recipe with the given name and cuisine.
#[allow(dead_code)]
pub fn sample_recipe(name: &str, cuisine: &str) -> Recipe {
    Recipe {
        id: None,
        name: name.to_string(),
        cuisine: cuisine.to_string(),
        prep_minutes: 25,
        calories: 640,
        ingredients: vec![
            "spaghetti".to_string(),
            "guanciale".to_string(),
            "egg".to_string(),
        ],
        cost: 12.3,
        shelf_life_days: 2,
        tags: vec!["dinner".to_string()],
        nutrition: "high-protein".to_string(),
    }
}

/// A feedback entry for (user, dish) cooked at the given RFC 3339 time.
#[allow(dead_code)]
pub fn feedback_entry(user_id: &str, dish_id: &str, rating: i32, cooked_at: &str) -> FeedbackEntry {
    FeedbackEntry {
        user_id: user_id.to_string(),
        dish_id: dish_id.to_string(),
        rating,
        skipped: false,
        substituted_with: String::new(),
        comment: String::new(),
        cooked_at: cooked_at.to_string(),
    }
}
