use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::clinic::{PublicUser, Slot};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::{
    BookingCreated, BookingList, ErrorEnvelope, RegisterPayload, RegisteredUser, Session,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Thin typed wrapper over the HTTP API. Holds the bearer token once logged in.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: None,
        })
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn require_token(&self) -> Result<(), ClientError> {
        if self.token.is_none() {
            return Err(ClientError::Unauthorized("Not logged in".to_string()));
        }
        Ok(())
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.clone());

        warn!("Request failed with {}: {}", status, message);
        Err(ClientError::from_response(status, message))
    }

    /// Logs in and keeps the issued token for subsequent calls.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Session, ClientError> {
        let response = self
            .request(Method::POST, "/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let session: Session = Self::parse(response).await?;
        self.token = Some(session.access_token.clone());
        Ok(session)
    }

    pub async fn register(&self, payload: &RegisterPayload) -> Result<PublicUser, ClientError> {
        let response = self
            .request(Method::POST, "/auth/register")
            .json(payload)
            .send()
            .await?;

        let registered: RegisteredUser = Self::parse(response).await?;
        Ok(registered.user)
    }

    /// Open slots in `[from, to)`.
    pub async fn available_slots(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Slot>, ClientError> {
        let response = self
            .request(Method::GET, "/slots")
            .query(&[
                ("from", from.format(DATE_FORMAT).to_string()),
                ("to", to.format(DATE_FORMAT).to_string()),
            ])
            .send()
            .await?;

        Self::parse(response).await
    }

    pub async fn create_booking(&self, slot_id: Uuid) -> Result<BookingCreated, ClientError> {
        self.require_token()?;

        let response = self
            .request(Method::POST, "/bookings")
            .json(&json!({ "slot_id": slot_id }))
            .send()
            .await?;

        Self::parse(response).await
    }

    pub async fn my_bookings(&self) -> Result<BookingList, ClientError> {
        self.require_token()?;

        let response = self.request(Method::GET, "/bookings/me").send().await?;
        Self::parse(response).await
    }

    pub async fn upcoming_bookings(&self, days: i64, limit: usize) -> Result<BookingList, ClientError> {
        self.require_token()?;

        let response = self
            .request(Method::GET, "/bookings/upcoming")
            .query(&[("days", days.to_string()), ("limit", limit.to_string())])
            .send()
            .await?;

        Self::parse(response).await
    }
}
