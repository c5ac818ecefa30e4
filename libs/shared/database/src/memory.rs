use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use shared_models::clinic::{
    Booking, BookingWithSlot, NewBooking, NewUserAccount, Slot, SlotStatus, UserAccount,
};

use crate::store::{ClinicStore, StoreError};

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, UserAccount>,
    slots: HashMap<Uuid, Slot>,
    bookings: Vec<Booking>,
}

/// In-process `ClinicStore`. One mutex guards every map, so `claim_slot`
/// has the same all-or-nothing behaviour as the conditional update upstream.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_slot(&self, slot: Slot) {
        self.state.lock().await.slots.insert(slot.id, slot);
    }

    /// Convenience for tests and local runs: an open slot of the given length.
    pub async fn add_open_slot(&self, start_time: DateTime<Utc>, minutes: i64) -> Slot {
        let slot = Slot {
            id: Uuid::new_v4(),
            doctor_id: None,
            start_time,
            end_time: start_time + chrono::Duration::minutes(minutes),
            status: SlotStatus::Open,
            created_at: Utc::now(),
        };
        self.add_slot(slot.clone()).await;
        slot
    }

    pub async fn booking_count(&self) -> usize {
        self.state.lock().await.bookings.len()
    }
}

#[async_trait]
impl ClinicStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_user(&self, user: NewUserAccount) -> Result<UserAccount, StoreError> {
        let mut state = self.state.lock().await;

        if state.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(format!("email {}", user.email)));
        }

        let account = UserAccount {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        state.users.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user(&self, user_id: Uuid) -> Result<Option<UserAccount>, StoreError> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }

    async fn list_open_slots(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Slot>, StoreError> {
        let state = self.state.lock().await;
        let mut slots: Vec<Slot> = state
            .slots
            .values()
            .filter(|s| s.is_open() && s.start_time >= from && s.start_time < to)
            .cloned()
            .collect();
        slots.sort_by_key(|s| s.start_time);
        Ok(slots)
    }

    async fn find_slot(&self, slot_id: Uuid) -> Result<Option<Slot>, StoreError> {
        Ok(self.state.lock().await.slots.get(&slot_id).cloned())
    }

    async fn claim_slot(&self, slot_id: Uuid) -> Result<Option<Slot>, StoreError> {
        let mut state = self.state.lock().await;
        match state.slots.get_mut(&slot_id) {
            Some(slot) if slot.is_open() => {
                slot.status = SlotStatus::Booked;
                Ok(Some(slot.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn release_slot(&self, slot_id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if let Some(slot) = state.slots.get_mut(&slot_id) {
            slot.status = SlotStatus::Open;
        }
        Ok(())
    }

    async fn insert_booking(&self, booking: NewBooking) -> Result<Booking, StoreError> {
        let mut state = self.state.lock().await;

        // Mirrors the unique index on active bookings per slot.
        if state
            .bookings
            .iter()
            .any(|b| b.slot_id == booking.slot_id && b.is_active())
        {
            return Err(StoreError::Duplicate(format!(
                "active booking for slot {}",
                booking.slot_id
            )));
        }

        let record = Booking {
            id: Uuid::new_v4(),
            user_id: booking.user_id,
            slot_id: booking.slot_id,
            status: booking.status,
            created_at: Utc::now(),
        };
        state.bookings.push(record.clone());
        Ok(record)
    }

    async fn bookings_for_user(&self, user_id: Uuid) -> Result<Vec<BookingWithSlot>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .map(|b| BookingWithSlot {
                booking: b.clone(),
                slot: state.slots.get(&b.slot_id).cloned(),
            })
            .collect())
    }
}
