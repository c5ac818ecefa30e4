use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use shared_config::AppConfig;

/// Non-success responses from the REST endpoint, kept typed so callers can
/// tell a unique-constraint violation apart from an outage.
#[derive(Error, Debug)]
pub enum SupabaseError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
}

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.db_connect_timeout_secs))
            .timeout(Duration::from_secs(config.db_connect_timeout_secs.max(1) * 3))
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            api_key: config.supabase_api_key.clone(),
        }
    }

    fn get_headers(&self, extra: Option<HeaderMap>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.api_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );

        if let Some(extra) = extra {
            headers.extend(extra);
        }

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: Option<HeaderMap>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut req = self
            .client
            .request(method, &url)
            .headers(self.get_headers(headers)?);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => SupabaseError::Auth(error_text),
                404 => SupabaseError::NotFound(error_text),
                409 => SupabaseError::Conflict(error_text),
                code => SupabaseError::Api { status: code, body: error_text },
            }
            .into());
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Headers asking PostgREST to echo the affected rows back.
    pub fn return_representation() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        headers
    }

    /// Round-trip to the REST root so a bad URL or key fails at startup.
    pub async fn ping(&self) -> Result<()> {
        let _: Value = self
            .request(Method::GET, "/rest/v1/", None)
            .await
            .map_err(|e| anyhow!("Store connectivity check failed: {}", e))?;
        Ok(())
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}
