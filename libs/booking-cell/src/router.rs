// libs/booking-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn booking_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(handlers::create_booking))
        .route("/me", get(handlers::my_bookings))
        .route("/upcoming", get(handlers::upcoming_bookings))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.config),
            auth_middleware,
        ))
        .with_state(state)
}
