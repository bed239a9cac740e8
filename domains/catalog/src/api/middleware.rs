//! Catalog domain state and auth backend integration

use std::sync::Arc;

use crate::CatalogRepositories;
use axum::extract::FromRef;
use marquee_auth::AuthBackend;
use marquee_classifier::ReviewClassifier;

/// Application state for the Catalog domain
#[derive(Clone)]
pub struct CatalogState {
    pub repos: CatalogRepositories,
    pub auth: AuthBackend,
    pub classifier: Arc<dyn ReviewClassifier>,
}

impl FromRef<CatalogState> for AuthBackend {
    fn from_ref(state: &CatalogState) -> Self {
        state.auth.clone()
    }
}
