//! Core domain types for the SpiceRoute meal-planning backend.
//!
//! This crate defines the wire-shaped records exchanged with the request
//! boundary and consumed by the record store:
//! - User dietary preference profiles
//! - Recipes, recipe identities, and list queries
//! - Post-meal feedback entries and batch submissions
//! - Record store configuration

pub mod config;
pub mod error;
pub mod feedback;
pub mod preference;
pub mod recipe;

pub use config::{PgSslMode, StoreConfig};
pub use error::{Error, Result};
pub use feedback::{FeedbackBatch, FeedbackEntry, effective_cooked_at};
pub use preference::Preference;
pub use recipe::{Recipe, RecipeId, RecipeQuery};

/// Maximum number of recipes returned by a single list query.
pub const MAX_RECIPE_LIST_RESULTS: u32 = 100;
