//! Marquee application composition root
//!
//! Composes all domain routers into a single application.

use std::sync::Arc;

use axum::Router;
use marquee_accounts::{AccountsRepositories, AccountsState};
use marquee_auth::{AuthBackend, AuthConfig};
use marquee_catalog::{CatalogRepositories, CatalogState};
use marquee_classifier::ReviewClassifier;
use marquee_common::{Config, DocumentStore};

/// Create the main application router with all routes
pub fn create_app(
    config: &Config,
    store: Arc<dyn DocumentStore>,
    classifier: Arc<dyn ReviewClassifier>,
) -> Result<Router, anyhow::Error> {
    let auth_config = AuthConfig::from_config(config)?;
    let auth = AuthBackend::new(auth_config, store.clone());

    let accounts_state = AccountsState {
        repos: AccountsRepositories::new(store.clone(), config.store_timeout),
        auth: auth.clone(),
    };

    let catalog_state = CatalogState {
        repos: CatalogRepositories::new(store, config.store_timeout),
        auth,
        classifier,
    };

    // Build router: domain routers plus shared infrastructure routes
    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { concat!("Marquee API v", env!("CARGO_PKG_VERSION")) }),
        )
        .merge(marquee_accounts::routes(accounts_state))
        .merge(marquee_catalog::routes(catalog_state));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
