use std::env;
use std::str::FromStr;

use chrono::{FixedOffset, Offset, Utc};
use thiserror::Error;
use tracing::{info, warn};

/// Longest access token lifetime accepted from the environment.
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not defined in the environment variables")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_api_key: String,
    pub jwt_secret: String,
    pub port: u16,
    pub token_ttl_hours: i64,
    /// Offset of the clinic's wall clock from UTC; decides what "today" means.
    pub clinic_utc_offset_minutes: i32,
    pub db_connect_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            supabase_url: required("SUPABASE_URL")?,
            supabase_api_key: required("SUPABASE_API_KEY")?,
            jwt_secret: required("JWT_SECRET")?,
            port: parse_or("PORT", 3000)?,
            token_ttl_hours: parse_or("TOKEN_TTL_HOURS", 24)?,
            clinic_utc_offset_minutes: parse_or("CLINIC_UTC_OFFSET_MINUTES", 0)?,
            db_connect_timeout_secs: parse_or("DB_CONNECT_TIMEOUT_SECS", 5)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.token_ttl_hours) {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_HOURS",
                value: self.token_ttl_hours.to_string(),
            });
        }

        if offset_from_minutes(self.clinic_utc_offset_minutes).is_none() {
            return Err(ConfigError::Invalid {
                key: "CLINIC_UTC_OFFSET_MINUTES",
                value: self.clinic_utc_offset_minutes.to_string(),
            });
        }

        Ok(())
    }

    pub fn clinic_offset(&self) -> FixedOffset {
        offset_from_minutes(self.clinic_utc_offset_minutes).unwrap_or_else(|| Utc.fix())
    }
}

// chrono only accepts offsets strictly inside +/-24h
fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt)
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn parse_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            warn!("{} has an unparseable value", key);
            ConfigError::Invalid { key, value: raw }
        }),
        Err(_) => {
            info!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}
