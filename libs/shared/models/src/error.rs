use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ExternalService(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Stable machine-readable kind, so clients can branch without parsing messages.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Auth(_) => "unauthorized",
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::ValidationError(_) => "validation_error",
            AppError::Conflict(_) => "conflict",
            AppError::Internal(_) => "internal",
            AppError::Database(_) => "database",
            AppError::ExternalService(_) => "external_service",
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::Auth(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Internal(msg)
            | AppError::Database(msg)
            | AppError::ValidationError(msg)
            | AppError::Conflict(msg)
            | AppError::ExternalService(msg) => msg,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!("Error: {}: {}", status, message);
        } else {
            tracing::debug!("Request rejected: {}: {}", status, message);
        }

        let body = Json(json!({
            "error": {
                "message": message,
                "code": self.code(),
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_conflict_response_shape() {
        let response = AppError::Conflict("Slot is already booked".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["message"], "Slot is already booked");
        assert_eq!(json["error"]["code"], "conflict");
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = AppError::ValidationError("Missing 'from' date".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "validation_error");
    }
}
