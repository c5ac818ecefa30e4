// libs/auth-cell/src/models.rs
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;
use shared_models::auth::{TokenResponse, UserRole};
use shared_models::clinic::PublicUser;
use shared_models::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;
const MAX_EMAIL_LEN: usize = 254;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern is valid")
});

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LEN && EMAIL_REGEX.is_match(email)
}

/// Emails are compared case-insensitively and stored lowercase.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, alias = "isDoctor")]
    pub is_doctor: bool,
}

impl RegisterRequest {
    pub fn role(&self) -> UserRole {
        if self.is_doctor {
            UserRole::Doctor
        } else {
            UserRole::Patient
        }
    }

    pub fn validate(&self) -> Result<(), AccountError> {
        if self.name.trim().is_empty() {
            return Err(AccountError::InvalidInput("Name is required".to_string()));
        }

        let email = normalize_email(&self.email);
        if email.is_empty() {
            return Err(AccountError::InvalidInput("Email is required".to_string()));
        }
        if !is_valid_email(&email) {
            return Err(AccountError::InvalidInput(format!("Invalid email address '{}'", email)));
        }

        if self.password.trim().chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AccountError> {
        if self.email.trim().is_empty() || self.password.trim().is_empty() {
            return Err(AccountError::InvalidInput(
                "Email and password are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Token plus profile, returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub token: TokenResponse,
    pub user: PublicUser,
}

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account not found")]
    NotFound,

    #[error("Credential processing failed: {0}")]
    Credential(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidInput(msg) => AppError::ValidationError(msg),
            AccountError::EmailTaken => AppError::Conflict(err.to_string()),
            AccountError::InvalidCredentials => AppError::Auth(err.to_string()),
            AccountError::NotFound => AppError::NotFound(err.to_string()),
            AccountError::Credential(msg) => AppError::Internal(msg),
            AccountError::Store(store) => store.into(),
        }
    }
}
