use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use shared_models::clinic::{
    Booking, BookingWithSlot, NewBooking, NewUserAccount, Slot, UserAccount,
};
use shared_models::error::AppError;

use crate::supabase::SupabaseError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Duplicate record: {0}")]
    Duplicate(String),

    #[error("Failed to decode {entity}: {reason}")]
    Decode { entity: &'static str, reason: String },

    #[error("Store request failed: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn decode(entity: &'static str, err: impl std::fmt::Display) -> Self {
        StoreError::Decode { entity, reason: err.to_string() }
    }
}

impl From<anyhow::Error> for StoreError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(supabase) = err.downcast_ref::<SupabaseError>() {
            return match supabase {
                SupabaseError::Conflict(body) => StoreError::Duplicate(body.clone()),
                other => StoreError::Backend(other.to_string()),
            };
        }

        if let Some(http) = err.downcast_ref::<reqwest::Error>() {
            if http.is_connect() || http.is_timeout() {
                return StoreError::Unavailable(http.to_string());
            }
        }

        StoreError::Backend(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(msg) => AppError::Conflict(msg),
            StoreError::Unavailable(msg) => AppError::ExternalService(msg),
            other => AppError::Database(other.to_string()),
        }
    }
}

/// Persistence seam for users, slots and bookings.
///
/// `claim_slot` is the only operation with a concurrency contract: it must
/// move a slot from `open` to `booked` atomically and return `None` to every
/// caller that loses the race (or names a slot that does not exist).
#[async_trait]
pub trait ClinicStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    async fn insert_user(&self, user: NewUserAccount) -> Result<UserAccount, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError>;

    async fn find_user(&self, user_id: Uuid) -> Result<Option<UserAccount>, StoreError>;

    /// Open slots starting in `[from, to)`, ordered by start time.
    async fn list_open_slots(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Slot>, StoreError>;

    async fn find_slot(&self, slot_id: Uuid) -> Result<Option<Slot>, StoreError>;

    async fn claim_slot(&self, slot_id: Uuid) -> Result<Option<Slot>, StoreError>;

    async fn release_slot(&self, slot_id: Uuid) -> Result<(), StoreError>;

    async fn insert_booking(&self, booking: NewBooking) -> Result<Booking, StoreError>;

    async fn bookings_for_user(&self, user_id: Uuid) -> Result<Vec<BookingWithSlot>, StoreError>;
}
