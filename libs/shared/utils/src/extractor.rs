use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::jwt::validate_token;

/// Pull the bearer token out of an `Authorization` header value.
pub fn bearer_token(value: Option<&str>) -> Result<&str, AppError> {
    let auth_value =
        value.ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    auth_value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Auth("Invalid authorization header format".to_string()))
}

// Validates the bearer token and stashes the caller in request extensions.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))
        })
        .transpose()?;

    let token = bearer_token(header)?;

    let user = validate_token(token, &config.jwt_secret).map_err(AppError::Auth)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc")).unwrap(), "abc");
        assert_matches!(bearer_token(None), Err(AppError::Auth(_)));
        assert_matches!(bearer_token(Some("Basic abc")), Err(AppError::Auth(_)));
        assert_matches!(bearer_token(Some("Bearer ")), Err(AppError::Auth(_)));
    }
}
