use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::clinic::{
    Booking, BookingWithSlot, NewBooking, NewUserAccount, Slot, SlotStatus, UserAccount,
};

use crate::store::{ClinicStore, StoreError};
use crate::supabase::SupabaseClient;

/// `ClinicStore` over the Supabase REST API (tables `users`, `slots`, `bookings`).
pub struct SupabaseStore {
    supabase: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Build the store and verify the backend answers; any failure here is fatal to startup.
    pub async fn connect(config: &AppConfig) -> Result<Self, StoreError> {
        let store = Self::new(config);
        info!("Connecting to store at {}", store.supabase.get_base_url());
        store.ping().await?;
        info!("Store connected");
        Ok(store)
    }

    fn parse_rows<T: DeserializeOwned>(
        rows: Vec<Value>,
        entity: &'static str,
    ) -> Result<Vec<T>, StoreError> {
        rows.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()
            .map_err(|e| StoreError::decode(entity, e))
    }

    fn first_row<T: DeserializeOwned>(
        rows: Vec<Value>,
        entity: &'static str,
    ) -> Result<Option<T>, StoreError> {
        Ok(Self::parse_rows(rows, entity)?.into_iter().next())
    }

    async fn get_rows(&self, path: &str) -> Result<Vec<Value>, StoreError> {
        let rows: Vec<Value> = self.supabase.request(Method::GET, path, None).await?;
        Ok(rows)
    }

    async fn write_rows(&self, method: Method, path: &str, body: Value) -> Result<Vec<Value>, StoreError> {
        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                method,
                path,
                Some(body),
                Some(SupabaseClient::return_representation()),
            )
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl ClinicStore for SupabaseStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.supabase
            .ping()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn insert_user(&self, user: NewUserAccount) -> Result<UserAccount, StoreError> {
        debug!("Inserting user {}", user.email);

        let user_data = json!({
            "name": user.name,
            "email": user.email,
            "password_hash": user.password_hash,
            "role": user.role.to_string(),
            "created_at": Utc::now().to_rfc3339(),
        });

        let rows = self.write_rows(Method::POST, "/rest/v1/users", user_data).await?;
        Self::first_row(rows, "user")?
            .ok_or_else(|| StoreError::Backend("Failed to create user".to_string()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError> {
        let path = format!(
            "/rest/v1/users?email=eq.{}&limit=1",
            urlencoding::encode(email)
        );
        Self::first_row(self.get_rows(&path).await?, "user")
    }

    async fn find_user(&self, user_id: Uuid) -> Result<Option<UserAccount>, StoreError> {
        let path = format!("/rest/v1/users?id=eq.{}", user_id);
        Self::first_row(self.get_rows(&path).await?, "user")
    }

    async fn list_open_slots(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Slot>, StoreError> {
        let path = format!(
            "/rest/v1/slots?status=eq.{}&start_time=gte.{}&start_time=lt.{}&order=start_time.asc",
            SlotStatus::Open,
            urlencoding::encode(&from.to_rfc3339()),
            urlencoding::encode(&to.to_rfc3339()),
        );
        Self::parse_rows(self.get_rows(&path).await?, "slot")
    }

    async fn find_slot(&self, slot_id: Uuid) -> Result<Option<Slot>, StoreError> {
        let path = format!("/rest/v1/slots?id=eq.{}", slot_id);
        Self::first_row(self.get_rows(&path).await?, "slot")
    }

    async fn claim_slot(&self, slot_id: Uuid) -> Result<Option<Slot>, StoreError> {
        // The status predicate makes this a compare-and-set: PostgREST applies
        // it in one UPDATE, so only one concurrent caller gets the row back.
        let path = format!(
            "/rest/v1/slots?id=eq.{}&status=eq.{}",
            slot_id,
            SlotStatus::Open
        );
        let rows = self
            .write_rows(Method::PATCH, &path, json!({ "status": SlotStatus::Booked }))
            .await?;
        Self::first_row(rows, "slot")
    }

    async fn release_slot(&self, slot_id: Uuid) -> Result<(), StoreError> {
        let path = format!(
            "/rest/v1/slots?id=eq.{}&status=eq.{}",
            slot_id,
            SlotStatus::Booked
        );
        self.write_rows(Method::PATCH, &path, json!({ "status": SlotStatus::Open }))
            .await?;
        Ok(())
    }

    async fn insert_booking(&self, booking: NewBooking) -> Result<Booking, StoreError> {
        let booking_data = json!({
            "user_id": booking.user_id,
            "slot_id": booking.slot_id,
            "status": booking.status,
            "created_at": Utc::now().to_rfc3339(),
        });

        let rows = self
            .write_rows(Method::POST, "/rest/v1/bookings", booking_data)
            .await?;
        Self::first_row(rows, "booking")?
            .ok_or_else(|| StoreError::Backend("Failed to create booking".to_string()))
    }

    async fn bookings_for_user(&self, user_id: Uuid) -> Result<Vec<BookingWithSlot>, StoreError> {
        let path = format!(
            "/rest/v1/bookings?user_id=eq.{}&select=*,slot:slots(*)",
            user_id
        );
        Self::parse_rows(self.get_rows(&path).await?, "booking")
    }
}
