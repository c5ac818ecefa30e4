// libs/slot-cell/src/router.rs
use axum::{routing::get, Router};

use shared_database::AppState;

use crate::handlers;

pub fn slot_routes(state: AppState) -> Router {
    // Listing availability is public; booking lives behind auth in booking-cell.
    Router::new()
        .route("/", get(handlers::list_available_slots))
        .with_state(state)
}
