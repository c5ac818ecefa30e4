// libs/booking-cell/src/models.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_database::StoreError;
use shared_models::error::AppError;

pub const DEFAULT_UPCOMING_DAYS: i64 = 7;
pub const DEFAULT_UPCOMING_LIMIT: usize = 3;
pub const MAX_UPCOMING_DAYS: i64 = 365;
pub const MAX_UPCOMING_LIMIT: usize = 50;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    #[serde(alias = "slotId")]
    pub slot_id: Option<String>,
}

impl CreateBookingRequest {
    pub fn parse_slot_id(&self) -> Result<Uuid, BookingError> {
        let raw = self
            .slot_id
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or(BookingError::MissingSlotId)?;

        Uuid::parse_str(raw).map_err(|_| BookingError::InvalidSlotId(raw.to_string()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpcomingQuery {
    pub days: Option<i64>,
    pub limit: Option<usize>,
}

impl UpcomingQuery {
    pub fn window_days(&self) -> Result<i64, BookingError> {
        match self.days {
            None => Ok(DEFAULT_UPCOMING_DAYS),
            Some(days) if (1..=MAX_UPCOMING_DAYS).contains(&days) => Ok(days),
            Some(days) => Err(BookingError::InvalidQuery(format!(
                "days must be between 1 and {}, got {}",
                MAX_UPCOMING_DAYS, days
            ))),
        }
    }

    pub fn limit(&self) -> Result<usize, BookingError> {
        match self.limit {
            None => Ok(DEFAULT_UPCOMING_LIMIT),
            Some(limit) if (1..=MAX_UPCOMING_LIMIT).contains(&limit) => Ok(limit),
            Some(limit) => Err(BookingError::InvalidQuery(format!(
                "limit must be between 1 and {}, got {}",
                MAX_UPCOMING_LIMIT, limit
            ))),
        }
    }
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Missing slot id")]
    MissingSlotId,

    #[error("Invalid slot id '{0}'")]
    InvalidSlotId(String),

    #[error("Slot {0} is no longer available")]
    SlotUnavailable(Uuid),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::MissingSlotId
            | BookingError::InvalidSlotId(_)
            | BookingError::InvalidQuery(_) => AppError::ValidationError(err.to_string()),
            BookingError::SlotUnavailable(_) => AppError::Conflict(
                "This slot has already been booked. Please pick another one.".to_string(),
            ),
            BookingError::Store(store) => store.into(),
        }
    }
}
