//! Catalog domain: movies, recommendations, admin reviews

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Movie, Ranking, RECOMMENDATION_LIMIT};

// Re-export repository types
pub use repository::{CatalogRepositories, MovieRepository, PreferenceRepository, RankingRepository};

// Re-export API types
pub use api::routes;
pub use api::CatalogState;
