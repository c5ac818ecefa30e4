// libs/slot-cell/src/handlers.rs
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;

use shared_database::AppState;
use shared_models::clinic::Slot;
use shared_models::error::AppError;

use crate::models::{SlotQueryParams, SlotRange};
use crate::services::SlotService;

#[axum::debug_handler]
pub async fn list_available_slots(
    State(state): State<AppState>,
    Query(params): Query<SlotQueryParams>,
) -> Result<Json<Vec<Slot>>, AppError> {
    let range = SlotRange::parse(&params)?;

    let slot_service = SlotService::new(&state);
    let slots = slot_service.available_slots(range, Utc::now()).await?;

    Ok(Json(slots))
}
