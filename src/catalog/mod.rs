pub mod models;
pub mod store;

// Re-export commonly used types
pub use models::{Category, CategorySummary, Choice, ExperienceLevel, JobRecord, JobType, LocationType};
pub use store::{CatalogError, JobStore};
