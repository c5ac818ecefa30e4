use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use axum_extra::{typed_header::TypedHeaderRejection, TypedHeader};
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use tracing::debug;

use shared_database::AppState;
use shared_models::error::AppError;
use shared_utils::jwt::validate_token;

use crate::models::{LoginRequest, LoginResponse, RegisterRequest};
use crate::services::AccountService;

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let account_service = AccountService::new(&state);
    let user = account_service.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "user": user,
            "message": "Account created successfully"
        })),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let account_service = AccountService::new(&state);
    let response = account_service.login(request).await?;

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    auth: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
) -> Result<Json<Value>, AppError> {
    let TypedHeader(auth) = auth.map_err(|rejection| {
        debug!("Rejected authorization header: {}", rejection);
        AppError::Auth("Missing or invalid authorization header".to_string())
    })?;

    let user = validate_token(auth.token(), &state.config.jwt_secret).map_err(AppError::Auth)?;
    debug!("Getting profile for user: {}", user.id);

    let account_service = AccountService::new(&state);
    let profile = account_service.profile(user.id).await?;

    Ok(Json(json!({
        "user": profile,
        "token_issued_at": user.issued_at
    })))
}
