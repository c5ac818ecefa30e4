// libs/booking-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use shared_database::{AppState, ClinicStore, StoreError};
use shared_models::auth::User;
use shared_models::clinic::{BookingStatus, BookingWithSlot, NewBooking};

use crate::models::BookingError;
use crate::services::upcoming::{select_upcoming, sort_by_start};

pub struct BookingService {
    store: Arc<dyn ClinicStore>,
}

impl BookingService {
    pub fn new(state: &AppState) -> Self {
        Self::with_store(Arc::clone(&state.store))
    }

    pub fn with_store(store: Arc<dyn ClinicStore>) -> Self {
        Self { store }
    }

    /// Claim the slot for `user` and record a confirmed booking.
    ///
    /// The claim is the store's conditional `open -> booked` update, so of any
    /// number of concurrent callers exactly one gets past it; the others (and
    /// callers naming an unknown slot) get `SlotUnavailable`.
    pub async fn book_slot(&self, user: &User, slot_id: Uuid) -> Result<BookingWithSlot, BookingError> {
        info!("Booking slot {} for user {}", slot_id, user.id);

        let slot = match self.store.claim_slot(slot_id).await? {
            Some(slot) => slot,
            None => {
                warn!("Slot {} is booked or does not exist", slot_id);
                return Err(BookingError::SlotUnavailable(slot_id));
            }
        };

        let new_booking = NewBooking {
            user_id: user.id,
            slot_id,
            status: BookingStatus::Confirmed,
        };

        match self.store.insert_booking(new_booking).await {
            Ok(booking) => {
                info!("Booking {} confirmed for slot {}", booking.id, slot_id);
                Ok(BookingWithSlot {
                    booking,
                    slot: Some(slot),
                })
            }
            // An active booking already holds the slot; it must stay booked.
            Err(StoreError::Duplicate(detail)) => {
                warn!("Slot {} already has an active booking: {}", slot_id, detail);
                Err(BookingError::SlotUnavailable(slot_id))
            }
            Err(e) => {
                warn!("Booking insert failed for slot {}, releasing it: {}", slot_id, e);
                if let Err(release_err) = self.store.release_slot(slot_id).await {
                    error!("Failed to release slot {} after aborted booking: {}", slot_id, release_err);
                }
                Err(e.into())
            }
        }
    }

    /// Every booking of `user_id`, earliest slot first.
    pub async fn my_bookings(&self, user_id: Uuid) -> Result<Vec<BookingWithSlot>, BookingError> {
        debug!("Fetching bookings for user {}", user_id);

        let mut bookings = self.store.bookings_for_user(user_id).await?;
        sort_by_start(&mut bookings);
        Ok(bookings)
    }

    pub async fn upcoming_bookings(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        window_days: i64,
        limit: usize,
    ) -> Result<Vec<BookingWithSlot>, BookingError> {
        let bookings = self.store.bookings_for_user(user_id).await?;
        Ok(select_upcoming(bookings, now, Duration::days(window_days), limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use shared_database::MemoryStore;
    use shared_models::clinic::{Booking, NewUserAccount, Slot, SlotStatus, UserAccount};
    use shared_utils::test_utils::TestUser;

    /// Delegates to a `MemoryStore` but fails every booking insert with `failure()`.
    struct FailingInserts {
        inner: MemoryStore,
        failure: fn() -> StoreError,
    }

    #[async_trait]
    impl ClinicStore for FailingInserts {
        async fn ping(&self) -> Result<(), StoreError> {
            self.inner.ping().await
        }
        async fn insert_user(&self, user: NewUserAccount) -> Result<UserAccount, StoreError> {
            self.inner.insert_user(user).await
        }
        async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError> {
            self.inner.find_user_by_email(email).await
        }
        async fn find_user(&self, user_id: Uuid) -> Result<Option<UserAccount>, StoreError> {
            self.inner.find_user(user_id).await
        }
        async fn list_open_slots(
            &self,
            from: DateTime<Utc>,
            to: DateTime<Utc>,
        ) -> Result<Vec<Slot>, StoreError> {
            self.inner.list_open_slots(from, to).await
        }
        async fn find_slot(&self, slot_id: Uuid) -> Result<Option<Slot>, StoreError> {
            self.inner.find_slot(slot_id).await
        }
        async fn claim_slot(&self, slot_id: Uuid) -> Result<Option<Slot>, StoreError> {
            self.inner.claim_slot(slot_id).await
        }
        async fn release_slot(&self, slot_id: Uuid) -> Result<(), StoreError> {
            self.inner.release_slot(slot_id).await
        }
        async fn insert_booking(&self, _booking: NewBooking) -> Result<Booking, StoreError> {
            Err((self.failure)())
        }
        async fn bookings_for_user(&self, user_id: Uuid) -> Result<Vec<BookingWithSlot>, StoreError> {
            self.inner.bookings_for_user(user_id).await
        }
    }

    #[tokio::test]
    async fn test_failed_insert_releases_slot() {
        let inner = MemoryStore::new();
        let slot = inner.add_open_slot(Utc::now() + Duration::hours(4), 30).await;
        let store = Arc::new(FailingInserts {
            inner,
            failure: || StoreError::Backend("insert rejected".to_string()),
        });
        let service = BookingService::with_store(store.clone());

        let user = TestUser::patient("p@example.com").to_user();
        let result = service.book_slot(&user, slot.id).await;

        assert_matches!(result, Err(BookingError::Store(StoreError::Backend(_))));
        let after = store.find_slot(slot.id).await.unwrap().unwrap();
        assert_eq!(after.status, SlotStatus::Open);
    }

    #[tokio::test]
    async fn test_duplicate_insert_keeps_slot_booked() {
        let inner = MemoryStore::new();
        let slot = inner.add_open_slot(Utc::now() + Duration::hours(4), 30).await;
        let store = Arc::new(FailingInserts {
            inner,
            failure: || StoreError::Duplicate("bookings_slot_id_active_key".to_string()),
        });
        let service = BookingService::with_store(store.clone());

        let user = TestUser::patient("p@example.com").to_user();
        let result = service.book_slot(&user, slot.id).await;

        assert_matches!(result, Err(BookingError::SlotUnavailable(id)) if id == slot.id);
        let after = store.find_slot(slot.id).await.unwrap().unwrap();
        assert_eq!(after.status, SlotStatus::Booked);
    }

    #[tokio::test]
    async fn test_unknown_slot_is_unavailable() {
        let service = BookingService::with_store(Arc::new(MemoryStore::new()));
        let user = TestUser::patient("p@example.com").to_user();
        let missing = Uuid::new_v4();

        assert_matches!(
            service.book_slot(&user, missing).await,
            Err(BookingError::SlotUnavailable(id)) if id == missing
        );
    }
}
