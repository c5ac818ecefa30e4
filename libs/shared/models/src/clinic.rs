use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::UserRole;

// ==============================================================================
// ACCOUNTS
// ==============================================================================

/// A stored account. `password_hash` is a PHC string and never leaves the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUserAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<UserAccount> for PublicUser {
    fn from(account: UserAccount) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            role: account.role,
            created_at: account.created_at,
        }
    }
}

// ==============================================================================
// SLOTS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Open,
    Booked,
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotStatus::Open => write!(f, "open"),
            SlotStatus::Booked => write!(f, "booked"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Slot {
    pub id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: SlotStatus,
    pub created_at: DateTime<Utc>,
}

impl Slot {
    pub fn is_open(&self) -> bool {
        self.status == SlotStatus::Open
    }
}

// ==============================================================================
// BOOKINGS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub slot_id: Uuid,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn is_active(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub slot_id: Uuid,
    pub status: BookingStatus,
}

/// A booking with its slot embedded, the shape "my bookings" returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingWithSlot {
    #[serde(flatten)]
    pub booking: Booking,
    pub slot: Option<Slot>,
}

impl BookingWithSlot {
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.slot.as_ref().map(|slot| slot.start_time)
    }
}
