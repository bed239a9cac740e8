//! Route definitions for Accounts domain API

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use marquee_auth::authenticate;

use super::handlers::users;
use super::middleware::AccountsState;

/// Routes reachable without a token
fn public_routes() -> Router<AccountsState> {
    Router::new()
        .route("/users", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/refresh", post(users::refresh))
}

/// Routes behind access-token verification
fn protected_routes(state: &AccountsState) -> Router<AccountsState> {
    Router::new()
        .route("/users", get(users::list_users))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            authenticate,
        ))
}

/// Create all Accounts domain API routes
pub fn routes(state: AccountsState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(&state))
        .with_state(state)
}
