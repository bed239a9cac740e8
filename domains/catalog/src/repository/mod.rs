//! Repository implementations for Catalog domain

pub mod movies;
pub mod preferences;
pub mod rankings;

use std::sync::Arc;
use std::time::Duration;

use marquee_common::DocumentStore;

pub use movies::MovieRepository;
pub use preferences::PreferenceRepository;
pub use rankings::RankingRepository;

/// Combined repository access for the Catalog domain
#[derive(Clone)]
pub struct CatalogRepositories {
    pub movies: MovieRepository,
    pub rankings: RankingRepository,
    pub preferences: PreferenceRepository,
}

impl CatalogRepositories {
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self {
            movies: MovieRepository::new(store.clone(), timeout),
            rankings: RankingRepository::new(store.clone(), timeout),
            preferences: PreferenceRepository::new(store, timeout),
        }
    }
}
