use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::clinic::{BookingWithSlot, PublicUser};

/// A logged-in session as returned by `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: PublicUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub password: String,
    pub is_doctor: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RegisteredUser {
    pub user: PublicUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingCreated {
    pub booking: BookingWithSlot,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingList {
    pub bookings: Vec<BookingWithSlot>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}
