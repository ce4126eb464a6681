//! Repository traits for record store operations.

pub mod feedback;
pub mod preferences;
pub mod recipes;

pub use feedback::FeedbackRepo;
pub use preferences::PreferenceRepo;
pub use recipes::RecipeRepo;
