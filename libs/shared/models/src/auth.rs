use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub iat: Option<u64>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Patient,
    Doctor,
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Patient => write!(f, "patient"),
            UserRole::Doctor => write!(f, "doctor"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

impl UserRole {
    /// Unknown role strings fall back to the least privileged role.
    pub fn parse_lossy(raw: Option<&str>) -> Self {
        match raw {
            Some("doctor") => UserRole::Doctor,
            Some("admin") => UserRole::Admin,
            _ => UserRole::Patient,
        }
    }
}

/// The authenticated caller, inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: Option<String>,
    pub role: UserRole,
    pub name: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
}

/// Bearer token as handed to clients at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}
