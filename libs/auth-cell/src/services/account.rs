// libs/auth-cell/src/services/account.rs
use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::MAX_TOKEN_TTL_HOURS;
use shared_database::{AppState, ClinicStore, StoreError};
use shared_models::auth::TokenResponse;
use shared_models::clinic::{NewUserAccount, PublicUser};
use shared_utils::jwt::issue_token;

use crate::models::{normalize_email, AccountError, LoginRequest, LoginResponse, RegisterRequest};
use crate::services::password::{hash_password, verify_password};

pub struct AccountService {
    store: Arc<dyn ClinicStore>,
    jwt_secret: String,
    token_ttl: Duration,
}

impl AccountService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
            jwt_secret: state.config.jwt_secret.clone(),
            token_ttl: Duration::hours(state.config.token_ttl_hours.clamp(1, MAX_TOKEN_TTL_HOURS)),
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<PublicUser, AccountError> {
        request.validate()?;

        let email = normalize_email(&request.email);
        debug!("Registering account for {}", email);

        if self.store.find_user_by_email(&email).await?.is_some() {
            warn!("Registration rejected, email already in use: {}", email);
            return Err(AccountError::EmailTaken);
        }

        let password = request.password.trim().to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AccountError::Credential(e.to_string()))?
            .map_err(|e| AccountError::Credential(e.to_string()))?;

        let new_user = NewUserAccount {
            name: request.name.trim().to_string(),
            email,
            password_hash,
            role: request.role(),
        };

        // The store's unique index still decides when two registrations race.
        let account = match self.store.insert_user(new_user).await {
            Ok(account) => account,
            Err(StoreError::Duplicate(_)) => return Err(AccountError::EmailTaken),
            Err(e) => return Err(e.into()),
        };

        info!("Registered {} account {}", account.role, account.id);
        Ok(account.into())
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AccountError> {
        request.validate()?;

        let email = normalize_email(&request.email);
        let password = request.password.trim().to_string();

        let account = match self.store.find_user_by_email(&email).await? {
            Some(account) => account,
            None => {
                debug!("Login for unknown email {}", email);
                return Err(AccountError::InvalidCredentials);
            }
        };

        let hash = account.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AccountError::Credential(e.to_string()))?
            .map_err(|e| AccountError::Credential(e.to_string()))?;

        if !matches {
            debug!("Wrong password for account {}", account.id);
            return Err(AccountError::InvalidCredentials);
        }

        let (access_token, expires_at) = issue_token(
            account.id,
            &account.email,
            account.role,
            &account.name,
            &self.jwt_secret,
            self.token_ttl,
        )
        .map_err(AccountError::Credential)?;

        info!("User {} logged in", account.id);

        Ok(LoginResponse {
            token: TokenResponse {
                access_token,
                token_type: "Bearer".to_string(),
                expires_at,
            },
            user: account.into(),
        })
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<PublicUser, AccountError> {
        self.store
            .find_user(user_id)
            .await?
            .map(PublicUser::from)
            .ok_or(AccountError::NotFound)
    }
}
