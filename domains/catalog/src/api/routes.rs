//! Route definitions for Catalog domain API

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use marquee_auth::authenticate;

use super::handlers::movies;
use super::middleware::CatalogState;

/// Routes reachable without a token
fn public_routes() -> Router<CatalogState> {
    Router::new().route("/movies", get(movies::list_movies))
}

/// Routes behind access-token verification. The review route additionally
/// requires `ADMIN` through its extractor.
fn protected_routes(state: &CatalogState) -> Router<CatalogState> {
    Router::new()
        .route("/movies", post(movies::create_movie))
        .route("/movies/recommended", get(movies::recommended_movies))
        .route(
            "/movies/{imdb_id}",
            get(movies::get_movie).delete(movies::delete_movie),
        )
        .route("/movies/review/{imdb_id}", patch(movies::update_review))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            authenticate,
        ))
}

/// Create all Catalog domain API routes
pub fn routes(state: CatalogState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(&state))
        .with_state(state)
}
