use axum::{
    routing::{get, post},
    Router,
};

use shared_database::AppState;

use crate::handlers;

pub fn auth_routes(state: AppState) -> Router {
    // `/me` reads the bearer token itself; the others are public.
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/me", get(handlers::me))
        .with_state(state)
}
