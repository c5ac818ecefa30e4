// libs/booking-cell/src/handlers.rs
use axum::{
    extract::{Extension, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{CreateBookingRequest, UpcomingQuery};
use crate::services::BookingService;

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let slot_id = request.parse_slot_id()?;

    let booking_service = BookingService::new(&state);
    let booking = booking_service.book_slot(&user, slot_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "booking": booking,
            "message": "Appointment booked successfully"
        })),
    ))
}

#[axum::debug_handler]
pub async fn my_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);
    let bookings = booking_service.my_bookings(user.id).await?;

    Ok(Json(json!({
        "bookings": bookings,
        "total": bookings.len()
    })))
}

#[axum::debug_handler]
pub async fn upcoming_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<UpcomingQuery>,
) -> Result<Json<Value>, AppError> {
    let window_days = query.window_days()?;
    let limit = query.limit()?;

    let booking_service = BookingService::new(&state);
    let bookings = booking_service
        .upcoming_bookings(user.id, Utc::now(), window_days, limit)
        .await?;

    Ok(Json(json!({
        "bookings": bookings,
        "total": bookings.len(),
        "window_days": window_days
    })))
}
